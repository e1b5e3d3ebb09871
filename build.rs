use std::env;
use std::fs;
use std::path::Path;

// Claves leídas con option_env! en src/config.rs
const CONFIG_KEYS: &[&str] = &[
    "OPPORTUNITIES_API_URL",
    "BACKEND_API_URL",
    "MAPBOX_ACCESS_TOKEN",
    "ENABLE_LOGGING",
    "DEFAULT_MAX_DISTANCE_KM",
    "MAX_SEARCH_PAGES",
    "DEFAULT_MAP_CENTER_LAT",
    "DEFAULT_MAP_CENTER_LNG",
    "DEFAULT_MAP_ZOOM",
];

fn main() {
    // Pasar los valores de .env a rustc para que option_env! los vea
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    if !CONFIG_KEYS.contains(&key) {
                        println!("cargo:warning=Ignorando clave desconocida en .env: {}", key);
                        continue;
                    }
                    // El entorno real gana sobre .env
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    } else {
        println!("cargo:warning=No se encontró archivo .env. Usando valores por defecto; copia .env.example a .env para configurar el backend y el token de Mapbox.");
    }

    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env.example");
}

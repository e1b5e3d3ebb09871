// ============================================================================
// STORAGE - Persistencia de preferencias en localStorage
// ============================================================================
// En nativo (tests) no hay navegador: las lecturas dan None y las escrituras no hacen nada
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{window, Storage};

    pub fn get_local_storage() -> Option<Storage> {
        window()?.local_storage().ok()?
    }

    pub fn load_string(key: &str) -> Option<String> {
        get_local_storage()?.get_item(key).ok()?
    }

    pub fn save_string(key: &str, value: &str) -> Result<(), String> {
        let storage = get_local_storage().ok_or("No se puede acceder a localStorage")?;
        storage
            .set_item(key, value)
            .map_err(|_| "Error escribiendo en localStorage".to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod web {
    pub fn load_string(_key: &str) -> Option<String> {
        None
    }

    pub fn save_string(_key: &str, _value: &str) -> Result<(), String> {
        Ok(())
    }
}

pub fn load_u32_pref(key: &str) -> Option<u32> {
    web::load_string(key)?.parse().ok()
}

pub fn load_bool_pref(key: &str) -> Option<bool> {
    web::load_string(key).map(|value| value == "true")
}

pub fn save_pref<T: ToString>(key: &str, value: T) {
    if let Err(e) = web::save_string(key, &value.to_string()) {
        log::warn!("⚠️ No se pudo guardar la preferencia {}: {}", key, e);
    }
}

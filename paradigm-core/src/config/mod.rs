pub use paradigm_kernel::config::*;

mod load;

pub use load::{
    base_config_dir, env_config_path, get_config, global_config_path, load_config,
    load_layer_from_path, set_config,
};

#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(test)]
static CONFIG_TEST_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

#[cfg(test)]
pub fn test_config_lock() -> &'static Mutex<()> {
    CONFIG_TEST_LOCK.get_or_init(|| Mutex::new(()))
}

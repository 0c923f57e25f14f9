//! File persistence configuration

pub struct AppPersistence {
    /// Path for saving/loading application UI state
    pub state_path: &'static str,
}

pub struct PersistenceConfig {
    pub app: AppPersistence,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    app: AppPersistence {
        state_path: ".states.json",
    },
};

/// Which [`RemoteStore`](crate::RemoteStore) implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// The hosted REST endpoint.
    Rest,
    /// In-process collections; nothing survives a restart.
    Memory,
}

/// Remote store configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Project URL of the hosted store, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Anonymous API key sent as `apikey` and bearer token.
    pub api_key: String,
    /// Database schema exposed by the REST layer (default: `public`).
    pub schema: String,
    /// Per-request timeout in seconds (default: `10`).
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Default    |
    /// |----------------------|------------|
    /// | `STORE_BACKEND`      | `rest`     |
    /// | `STORE_URL`          | (required for `rest`) |
    /// | `STORE_API_KEY`      | (required for `rest`) |
    /// | `STORE_SCHEMA`       | `public`   |
    /// | `STORE_TIMEOUT_SECS` | `10`       |
    pub fn from_env() -> Self {
        let backend = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "rest".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "rest" => StoreBackend::Rest,
            "memory" => StoreBackend::Memory,
            other => panic!("STORE_BACKEND must be 'rest' or 'memory', got '{other}'"),
        };

        let (url, api_key) = match backend {
            StoreBackend::Rest => (
                std::env::var("STORE_URL").expect("STORE_URL must be set"),
                std::env::var("STORE_API_KEY").expect("STORE_API_KEY must be set"),
            ),
            StoreBackend::Memory => (String::new(), String::new()),
        };

        let schema = std::env::var("STORE_SCHEMA").unwrap_or_else(|_| "public".into());

        let timeout_secs: u64 = std::env::var("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("STORE_TIMEOUT_SECS must be a valid u64");

        Self {
            backend,
            url,
            api_key,
            schema,
            timeout_secs,
        }
    }

    /// Configuration for an in-memory store.
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: String::new(),
            api_key: String::new(),
            schema: "public".into(),
            timeout_secs: 10,
        }
    }
}

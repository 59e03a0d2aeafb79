#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use figment::{
    providers::{Format, Yaml},
    Figment,
};
use sessionkit::auth::{LoginPrompt, Navigator};
use sessionkit::config::{extract_config, ConfigV1};
use sessionkit::startup::build_state;
use sessionkit::state::AppState;

/// Config pointing at `base_url` with a short splash so tests stay fast.
pub fn test_config(base_url: &str, min_splash_ms: u64) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
api:
  base_url: "{}"
  timeout_in_ms: 2000
bootstrap:
  use_mock_data: false
  min_splash_ms: {}
logging:
  level: "debug"
  format: "json"
"#,
        base_url, min_splash_ms
    );

    extract_config(Figment::new().merge(Yaml::string(&yaml)))
        .expect("Failed to parse test config YAML")
}

pub fn build_app(config: ConfigV1) -> AppState {
    build_state(Arc::new(config)).expect("failed to build app state")
}

/// Records what the callback screen asked the UI to do.
#[derive(Default)]
pub struct RecordingUi {
    pub replaced: Mutex<Vec<String>>,
    pub login_prompts: Mutex<usize>,
}

impl Navigator for RecordingUi {
    fn replace(&self, path: &str) {
        self.replaced.lock().unwrap().push(path.to_string());
    }
}

impl LoginPrompt for RecordingUi {
    fn open_login(&self) {
        *self.login_prompts.lock().unwrap() += 1;
    }
}

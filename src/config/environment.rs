use std::env;
use std::path::Path;

/// Resolved once at startup and injected; the store never asks.
///
/// A build is in development mode when its executable path contains
/// `-dev`, or when `DEBUG` or `DEV` is set to a non-empty value.
pub fn detect_dev_mode() -> bool {
    let exe = env::current_exe().ok();
    dev_mode_from(exe.as_deref(), |name| env::var(name).ok())
}

fn dev_mode_from(exe: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> bool {
    let dev_executable = exe.is_some_and(|p| p.to_string_lossy().contains("-dev"));

    dev_executable
        || ["DEBUG", "DEV"]
            .iter()
            .any(|var| lookup(*var).is_some_and(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_dev_executable_name() {
        let exe = Path::new("/opt/dailies/dailies-dev");
        assert!(dev_mode_from(Some(exe), env_of(&[])));

        let exe = Path::new("/opt/dailies/dailies");
        assert!(!dev_mode_from(Some(exe), env_of(&[])));
    }

    #[test]
    fn test_dev_install_directory() {
        let exe = Path::new("/opt/app-dev/bin/dailies");
        assert!(dev_mode_from(Some(exe), env_of(&[])));
    }

    #[test]
    fn test_debug_and_dev_variables() {
        assert!(dev_mode_from(None, env_of(&[("DEBUG", "1")])));
        assert!(dev_mode_from(None, env_of(&[("DEV", "yes")])));
        assert!(!dev_mode_from(None, env_of(&[("DEBUG", "")])));
        assert!(!dev_mode_from(None, env_of(&[("RUST_LOG", "debug")])));
    }
}

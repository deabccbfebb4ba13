use std::path::PathBuf;

use webserve::config::Config;

fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.server.listen_addr(), "0.0.0.0:5555");
    assert_eq!(cfg.static_files.root, PathBuf::from("./www"));
    assert_eq!(cfg.static_files.index, "index.html");
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_config_from_yaml() {
    let yaml = "
server:
  host: 127.0.0.1
  port: 8080
static_files:
  root: /srv/site
  index: home.html
";
    let cfg = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(cfg.server.listen_addr(), "127.0.0.1:8080");
    assert_eq!(cfg.static_files.root, PathBuf::from("/srv/site"));
    assert_eq!(cfg.static_files.index, "home.html");
}

#[test]
fn test_config_partial_yaml_keeps_defaults() {
    let cfg = Config::from_yaml_str("server:\n  port: 9000\n").unwrap();

    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.static_files.index, "index.html");
}

#[test]
fn test_config_empty_yaml_is_default() {
    let cfg = Config::from_yaml_str("  \n").unwrap();
    assert_eq!(cfg.server.port, 5555);
}

#[test]
fn test_config_invalid_yaml() {
    assert!(Config::from_yaml_str("server: [1, 2").is_err());
    assert!(Config::from_yaml_str("server:\n  port: not-a-number\n").is_err());
}

#[test]
fn test_config_env_overrides() {
    let mut cfg = Config::default();
    cfg.apply_env(lookup(&[("PORT", "6000"), ("DOC_ROOT", "/tmp/site")]))
        .unwrap();

    assert_eq!(cfg.server.port, 6000);
    assert_eq!(cfg.static_files.root, PathBuf::from("/tmp/site"));
}

#[test]
fn test_config_env_bad_port() {
    let mut cfg = Config::default();
    assert!(cfg.apply_env(lookup(&[("PORT", "http")])).is_err());
    assert!(cfg.set_port("70000").is_err());
}

#[test]
fn test_config_port_range() {
    let mut cfg = Config::default();

    cfg.set_port("1023").unwrap();
    assert!(cfg.validate().is_err());

    cfg.set_port("1024").unwrap();
    assert!(cfg.validate().is_ok());

    cfg.set_port("65535").unwrap();
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_config_rejects_bad_index() {
    let mut cfg = Config::default();

    cfg.static_files.index = String::new();
    assert!(cfg.validate().is_err());

    cfg.static_files.index = "sub/index.html".to_string();
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.server.listen_addr(), cfg2.server.listen_addr());
}

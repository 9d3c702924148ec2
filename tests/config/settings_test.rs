#[cfg(test)]
mod tests {
    use metaql::cluster::{SnapshotClient, DEFAULT_TIMEOUT_SECS};
    use metaql::config::{Settings, SettingsError, BOOTSTRAP_SERVERS};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_file() {
        let file = write_file(
            r#"
[client]
"bootstrap.servers" = "b1:9092,b2:9092"
"security.protocol" = "SSL"

[agent]
path = "/opt/metaql/agent"
timeout_secs = 5
"#,
        );

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.bootstrap_servers().unwrap(), "b1:9092,b2:9092");
        assert_eq!(settings.client["security.protocol"], "SSL");
        assert_eq!(settings.agent.timeout_secs, 5);
        assert_eq!(
            settings.agent_path(),
            Some(PathBuf::from("/opt/metaql/agent"))
        );
    }

    #[test]
    fn test_resolve_overrides_file_endpoint() {
        let file = write_file("[client]\n\"bootstrap.servers\" = \"file:9092\"\n");

        let settings = Settings::resolve(Some(file.path()), Some("cli:9092")).unwrap();
        assert_eq!(settings.bootstrap_servers().unwrap(), "cli:9092");

        let settings = Settings::resolve(Some(file.path()), None).unwrap();
        assert_eq!(settings.bootstrap_servers().unwrap(), "file:9092");
        assert_eq!(settings.agent.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_env_expansion() {
        std::env::set_var("METAQL_SETTINGS_TEST_HOST", "envhost");
        let file = write_file(
            "[client]\n\"bootstrap.servers\" = \"${METAQL_SETTINGS_TEST_HOST}:9092\"\n\"sasl.username\" = \"$METAQL_SETTINGS_TEST_HOST\"\n",
        );

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.bootstrap_servers().unwrap(), "envhost:9092");

        let params = settings.connection_params().unwrap();
        assert_eq!(params.properties[BOOTSTRAP_SERVERS], "envhost:9092");
        assert_eq!(params.properties["sasl.username"], "envhost");
    }

    #[test]
    fn test_missing_env_var() {
        let settings =
            Settings::resolve(None, Some("${METAQL_SETTINGS_TEST_UNSET_VAR}:9092")).unwrap();
        let err = settings.bootstrap_servers().unwrap_err();
        assert!(
            matches!(err, SettingsError::MissingEnvVar(ref name) if name == "METAQL_SETTINGS_TEST_UNSET_VAR")
        );
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::resolve(Some("/nonexistent/metaql.toml".as_ref()), None).unwrap_err();
        assert!(matches!(err, SettingsError::FileNotFound(_)));
    }

    #[test]
    fn test_malformed_file() {
        let file = write_file("[client\n");
        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::ParseError(_)));
    }

    #[test]
    fn test_missing_endpoint() {
        let settings = Settings::resolve(None, None).unwrap();
        let err = settings.bootstrap_servers().unwrap_err();
        assert!(matches!(err, SettingsError::MissingEndpoint));
        assert_eq!(err.to_string(), "Missing bootstrap.servers");

        let settings = Settings::resolve(None, Some("  ")).unwrap();
        assert!(matches!(
            settings.bootstrap_servers(),
            Err(SettingsError::MissingEndpoint)
        ));
    }

    #[test]
    fn test_snapshot_from_file() {
        let file = write_file(r#"{"cluster": {"nodes": [{"id": 7, "host": "solo", "port": 9092}], "controller_id": 7}}"#);
        let client = SnapshotClient::from_file(file.path()).unwrap();
        assert_eq!(client.snapshot().cluster.nodes.len(), 1);

        let file = write_file("not json");
        assert!(SnapshotClient::from_file(file.path()).is_err());
    }
}

use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Ensure directory exists.
pub fn ensure_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| format!("Unable to create directory {}: {}", path.display(), e))?;
    }
    #[cfg(unix)]
    {
        fs::set_permissions(path, fs::Permissions::from_mode(0o700)).ok();
    }
    Ok(())
}

/// Fresh random entity id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Parse `key=value` assignments. Entries without `=` are ignored.
pub fn parse_vars(vars: &[String]) -> HashMap<String, String> {
    vars.iter()
        .filter_map(|v| v.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vars_split_on_first_equals() {
        let vars = parse_vars(&[
            "topic = cats".to_string(),
            "query=a=b".to_string(),
            "broken".to_string(),
        ]);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["topic"], "cats");
        assert_eq!(vars["query"], "a=b");
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON or YAML input file (by extension) into a typed struct.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let is_yaml = canonical
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let value: T = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    Ok(value)
}

/// Resolve relative paths against the working directory and check the target is a file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use invest_dist_core::analysis::report::DistributionAnalysisInput;

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir()
            .join(format!("idist-input-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_reads_yaml_by_extension() {
        let path = write_temp(
            "in.yaml",
            "initial_assets: 2000000\nexpected_return: 6\nrisk: 12\nyears: 15\nmodel: normal\n",
        );
        let input: DistributionAnalysisInput = read_input(&path).unwrap();
        assert_eq!(input.initial_assets, 2_000_000.0);
        assert_eq!(input.num_points, 300);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_reads_json() {
        let path = write_temp(
            "in.json",
            r#"{"initial_assets": 1000, "expected_return": 4, "risk": 10, "years": 2}"#,
        );
        let input: DistributionAnalysisInput = read_input(&path).unwrap();
        assert_eq!(input.years, 2.0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = read_input::<DistributionAnalysisInput>("/nonexistent/idist.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}

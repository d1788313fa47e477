/// Program name as printed in the version line.
const PROGRAM_NAME: &str = "go-groups";

/// Get local version from Cargo.toml at compile time
fn local_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// The line printed by `go-groups -v`.
pub fn version_string() -> String {
    format!("{PROGRAM_NAME} version {}", local_version())
}

/// Print the version line to stdout.
pub fn run() {
    println!("{}", version_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string() {
        let version = version_string();
        assert!(version.starts_with("go-groups version "));
        assert!(version.ends_with(env!("CARGO_PKG_VERSION")));
    }
}

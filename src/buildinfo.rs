/// Release builds stamp these through the environment at compile time
const COMMIT: Option<&str> = option_env!("YTCLI_COMMIT");
const BUILD_DATE: Option<&str> = option_env!("YTCLI_BUILD_DATE");

pub fn string() -> String {
    format!(
        "ytcli {} (commit {}, built {})",
        env!("CARGO_PKG_VERSION"),
        COMMIT.filter(|s| !s.is_empty()).unwrap_or("none"),
        BUILD_DATE.filter(|s| !s.is_empty()).unwrap_or("unknown"),
    )
}

//! Logging setup utilities for the roomchat binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose log output is enabled by the default filter.
const WORKSPACE_CRATES: [&str; 3] = ["roomchat_shared", "roomchat_server", "roomchat_client"];

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for every workspace crate and the binary.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "roomchat-server", "roomchat-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use roomchat_shared::logger::setup_logger;
///
/// setup_logger("roomchat-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directives(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut targets: Vec<String> = WORKSPACE_CRATES.iter().map(|t| t.to_string()).collect();
    if !targets.contains(&binary_target) {
        targets.push(binary_target);
    }

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_workspace_and_binary() {
        // テスト項目: デフォルトのフィルタにワークスペースの全クレートとバイナリが含まれる
        // given (前提条件):
        let binary_name = "roomchat-client";

        // when (操作):
        let directives = default_directives(binary_name, "info");

        // then (期待する結果):
        assert_eq!(
            directives,
            "roomchat_shared=info,roomchat_server=info,roomchat_client=info"
        );
    }

    #[test]
    fn test_default_directives_append_foreign_binary() {
        // テスト項目: ワークスペース外の名前のバイナリはフィルタに追加される
        // given (前提条件):
        let binary_name = "chat-tool";

        // when (操作):
        let directives = default_directives(binary_name, "debug");

        // then (期待する結果):
        assert!(directives.ends_with(",chat_tool=debug"));
        assert!(directives.starts_with("roomchat_shared=debug"));
    }
}

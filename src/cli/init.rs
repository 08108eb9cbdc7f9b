//! Init command implementation
//!
//! Scaffolds a new Licita deployment: `licita.toml`, `.env.example` and a `.gitignore`.

use super::output::Output;
use crate::utils::toml_config::SearchBackend;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (licita.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Search backend to configure
    pub search: SearchBackend,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Licita");

    let base_path = &config.path;

    let config_path = base_path.join("licita.toml");
    if config_path.exists() && !config.force {
        output.warning("licita.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if !base_path.exists() {
        if let Err(e) = fs::create_dir_all(base_path) {
            output.error(&format!("Failed to create {}: {}", base_path.display(), e));
            return InitResult::Error(e.to_string());
        }
        output.created_dir(&base_path.display().to_string());
    }

    output.subheader("Creating configuration files");

    let toml_content = generate_licita_toml(&config);
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.error(&format!("Failed to create licita.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "licita.toml");

    let env_example_path = base_path.join(".env.example");
    match write_file(&env_example_path, &generate_env_example(), config.force) {
        Ok(true) => output.created("env", ".env.example"),
        Ok(false) => output.skipped(".env.example", "already exists"),
        Err(e) => {
            output.error(&format!("Failed to create .env.example: {}", e));
            return InitResult::Error(e.to_string());
        }
    }

    let gitignore_path = base_path.join(".gitignore");
    match write_file(&gitignore_path, &generate_gitignore(), false) {
        Ok(true) => output.created("file", ".gitignore"),
        Ok(false) => output.skipped(".gitignore", "already exists"),
        Err(e) => output.warning(&format!("Failed to create .gitignore: {}", e)),
    }

    output.complete("Licita initialized successfully!");

    output.header("Next Steps");
    output.newline();

    let mut step = 1;
    if config.search == SearchBackend::Tavily {
        output.info(&format!("{}. Set your Tavily API key:", step));
        output.command("cp .env.example .env");
        output.command("# Edit .env and set TAVILY_API_KEY");
        output.newline();
        step += 1;
    }

    output.info(&format!("{}. Start Ollama and pull the models:", step));
    output.command("ollama serve");
    output.command("ollama pull llama3.1:8b");
    output.command("ollama pull deepseek-r1:8b");
    output.newline();
    step += 1;

    output.info(&format!("{}. Start the server:", step));
    output.command("licita-server");
    output.newline();

    output.hint(&format!(
        "Server will be available at http://{}:{}",
        config.host, config.port
    ));
    output.hint("Ask from the terminal with: licita-server ask \"<pergunta>\"");

    InitResult::Success
}

/// Returns `false` when an existing file was left alone
fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    fs::write(path, content)?;
    Ok(true)
}

fn generate_licita_toml(config: &InitConfig) -> String {
    let search_section = match config.search {
        SearchBackend::Tavily => {
            r#"[search]
provider = "tavily"
api_key_env = "TAVILY_API_KEY"
base_url = "https://api.tavily.com"
max_results = 2
allowed_domains = ["planalto.gov.br", "sefaz.mt.gov.br", "gov.br"]
"#
        }
        SearchBackend::DuckDuckGo => {
            r#"# DuckDuckGo needs no API key
[search]
provider = "duckduckgo"
max_results = 2
allowed_domains = ["planalto.gov.br", "sefaz.mt.gov.br", "gov.br"]
"#
        }
    };

    format!(
        r#"# Licita Configuration
# ====================
# Generated by: licita-server init
#
# Hot Reloading: search and pipeline settings are re-read on change;
# models, providers and the listen address need a restart.

# =============================================================================
# Server Configuration
# =============================================================================
[server]
host = "{host}"
port = {port}
log_level = "info"
log_format = "pretty"
cors_origins = ["http://localhost:3000", "http://localhost:3001"]

# =============================================================================
# LLM Providers
# =============================================================================
[providers.ollama-local]
type = "ollama"
base_url = "http://localhost:11434"

# =============================================================================
# Models
# =============================================================================
# Query generation and per-page summaries
[models.general]
provider = "ollama-local"
model = "llama3.1:8b"

# Final synthesis; <think> output becomes the thinking process
[models.reasoning]
provider = "ollama-local"
model = "deepseek-r1:8b"

# =============================================================================
# Search
# =============================================================================
{search_section}
# =============================================================================
# Pipeline
# =============================================================================
[pipeline]
general_model = "general"
reasoning_model = "reasoning"
# Seconds per search branch; 0 disables the limit
branch_timeout_secs = 120
"#,
        host = config.host,
        port = config.port,
        search_section = search_section,
    )
}

fn generate_env_example() -> String {
    r#"# Licita Environment Variables
# ============================
# Copy this file to .env and fill in the values.

# Tavily search API key (required when [search] provider = "tavily")
TAVILY_API_KEY=tvly-your-key-here

# Optional: Logging level (trace, debug, info, warn, error)
RUST_LOG=info,licita=debug
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"# Environment
.env
.env.local
.env.*.local

# Rust
/target/

# IDE
.idea/
.vscode/
*.swp
*~

# OS
.DS_Store
Thumbs.db
"#
    .to_string()
}

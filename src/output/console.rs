//! Console output utilities.

use console::{style, Term};
use url::Url;

use crate::error::{Error, Result};

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Flickr Dumper                                     ║
║     Download the whole Flickr library to disk         ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Show the authorization URL and read the verifier code from the terminal.
pub fn prompt_for_verifier(authorize_url: &Url) -> Result<String> {
    println!();
    print_info("Open this URL in your browser and allow read access:");
    println!("  {}", style(authorize_url.as_str()).underlined());
    println!();

    let term = Term::stdout();
    term.write_str(&format!("{} ", style("Verifier code:").bold()))?;
    let verifier = term
        .read_line()
        .map_err(|e| Error::Auth(format!("Failed to read verifier code: {}", e)))?;

    Ok(verifier.trim().to_string())
}

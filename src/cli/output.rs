use console::style;
use std::fmt::Display;

/// Centralized output formatting for consistent CLI presentation
pub struct Output;

impl Output {
    /// Print a success message with checkmark
    pub fn success<T: Display>(message: T) {
        println!("{} {}", style("✓").green(), message);
    }

    /// Print a warning message; used for handled precondition failures
    pub fn warning<T: Display>(message: T) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    /// Print an info message
    pub fn info<T: Display>(message: T) {
        println!("{} {}", style("ℹ").cyan(), message);
    }

    /// Print a tip/suggestion
    pub fn tip<T: Display>(message: T) {
        println!("{} {}", style("TIP:").cyan(), style(message).dim());
    }

    /// Render the stack bottom-to-top: names below the active patch plain,
    /// the active patch highlighted, names above it dimmed.
    pub fn render_stack(patches: &[String], active: &str) {
        let mut above_active = false;
        for patch in patches {
            if patch == active {
                println!("{}", style(patch).bold().reverse());
                above_active = true;
            } else if above_active {
                println!("{}", style(patch).dim());
            } else {
                println!("{patch}");
            }
        }
    }
}

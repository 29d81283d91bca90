//! Screen port - what the user sees and answers

use crate::domain::Route;
use crate::view::{ListView, OpportunityRow};

/// The surface user actions report back to
///
/// Stands in for the page: blocking alerts, the inline error line on the
/// login form, confirmation dialogs, navigation and the rendered list.
pub trait Screen: Send + Sync {
    /// Blocking alert dialog
    fn alert(&self, message: &str);

    /// Inline error text on the login form
    fn show_error(&self, message: &str);

    /// Ask the user to confirm; `false` means cancelled
    fn confirm(&self, prompt: &str) -> bool;

    /// Leave the current page
    fn navigate(&self, route: Route);

    /// Header greeting for the signed-in user
    fn set_username(&self, username: &str);

    /// Replace the rendered list
    fn render_list(&self, view: &ListView);

    /// Show a single opportunity
    fn render_detail(&self, row: &OpportunityRow);

    /// Empty the add-opportunity inputs
    fn clear_opportunity_form(&self);
}

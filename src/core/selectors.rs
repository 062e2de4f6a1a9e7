//! CSS selectors for the comparison page markup.

/// Container holding the cash-pickup comparison list.
pub const CASH_TAB: &str = "#cash-tab";
/// One provider row inside the container.
pub const PROVIDER_ITEM: &str = "#cash-tab li[data-v-798eb8c7]";
pub const DETAILS_BUTTON: &str = r#"button[data-v-3a2e731a][title="Details"]"#;

pub const MOBILE_APP_IMAGE: &str = r#"img[src*="simple-app-mobile"]"#;
pub const LOGO_IMAGE: &str = r#"img[alt]:not([src*="simple-app-mobile"])"#;
pub const BEST_DEAL_MARKER: &str = ".bg-green-800";
pub const SCORE: &str = "strong[data-v-e3dd9688]";
pub const TRANSFER_TIME: &str = ".font-semibold.text-16, .font-semibold.text-18";
pub const MUTED_FEE: &str = ".text-gray-500 strong";
pub const RATE: &str = ".text-gray-700 strong";
pub const BOLD: &str = ".font-semibold";
pub const STRUCK: &str = ".line-through";
pub const STRUCK_CLASS: &str = "line-through";

pub const DETAIL_PANEL: &str = ".bg-gray-50.rounded-b-6";
pub const DETAIL_ROW: &str = ".flex.mt-3";
pub const DETAIL_VALUE: &str = ".text-right.font-semibold p";
pub const RECIPIENT_SECTION: &str = ".border-t-2.border-gray-200";
pub const PARAGRAPH: &str = "p";

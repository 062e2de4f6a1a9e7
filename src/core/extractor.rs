//! Reads provider fields out of the rendered comparison list.
//!
//! Every output field is resolved by an ordered list of independent resolvers;
//! the first one that yields a value wins. Resolvers reading the expanded
//! detail panel come first so they override the summary row when present.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::selectors;
use super::session::SessionHandle;
use super::text::{contains_free_token, fee_parse, numeric_parse};
use crate::models::{CurrencyPair, RawPricing, RawProviderFields};
use crate::{AppError, Result};

/// Compiled selectors for one extraction pass.
pub struct ProviderSelectors {
    item: Selector,
    mobile_app_image: Selector,
    logo: Selector,
    best_deal: Selector,
    score: Selector,
    transfer_time: Selector,
    muted_fee: Selector,
    rate: Selector,
    bold: Selector,
    struck: Selector,
    detail_panel: Selector,
    detail_row: Selector,
    detail_value: Selector,
    recipient_section: Selector,
    paragraph: Selector,
}

fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Parse {
        message: format!("Invalid CSS selector '{}': {:?}", css, e),
    })
}

impl ProviderSelectors {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            item: compile(selectors::PROVIDER_ITEM)?,
            mobile_app_image: compile(selectors::MOBILE_APP_IMAGE)?,
            logo: compile(selectors::LOGO_IMAGE)?,
            best_deal: compile(selectors::BEST_DEAL_MARKER)?,
            score: compile(selectors::SCORE)?,
            transfer_time: compile(selectors::TRANSFER_TIME)?,
            muted_fee: compile(selectors::MUTED_FEE)?,
            rate: compile(selectors::RATE)?,
            bold: compile(selectors::BOLD)?,
            struck: compile(selectors::STRUCK)?,
            detail_panel: compile(selectors::DETAIL_PANEL)?,
            detail_row: compile(selectors::DETAIL_ROW)?,
            detail_value: compile(selectors::DETAIL_VALUE)?,
            recipient_section: compile(selectors::RECIPIENT_SECTION)?,
            paragraph: compile(selectors::PARAGRAPH)?,
        })
    }
}

/// One provider list item together with what the resolvers need to read it.
pub struct ItemView<'a> {
    item: ElementRef<'a>,
    panel: Option<ElementRef<'a>>,
    selectors: &'a ProviderSelectors,
    currencies: &'a CurrencyPair,
}

type Resolver<T> = fn(&ItemView<'_>) -> Option<T>;

fn resolve<T>(view: &ItemView<'_>, resolvers: &[Resolver<T>]) -> Option<T> {
    resolvers.iter().find_map(|resolver| resolver(view))
}

const IDENTITY: &[Resolver<(String, Option<String>)>] = &[logo_image];
const SCORE: &[Resolver<f64>] = &[score_emphasis];
const TRANSFER_TIME: &[Resolver<String>] = &[labeled_transfer_time];
const PROMOTIONAL_FEE: &[Resolver<f64>] = &[panel_promotional_fee, muted_fee, free_token_fee];
const PROMOTIONAL_RATE: &[Resolver<f64>] = &[panel_promotional_rate, rate_emphasis];
const PROMOTIONAL_RECIPIENT: &[Resolver<f64>] = &[panel_promotional_recipient, bold_recipient];
const REGULAR_FEE: &[Resolver<f64>] = &[panel_regular_fee, struck_fee];
const REGULAR_RATE: &[Resolver<f64>] = &[panel_regular_rate, struck_rate];
const REGULAR_RECIPIENT: &[Resolver<f64>] = &[panel_regular_recipient, struck_recipient];

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn is_struck(element: ElementRef<'_>) -> bool {
    element
        .value()
        .classes()
        .any(|class| class == selectors::STRUCK_CLASS)
}

impl<'a> ItemView<'a> {
    fn select(&self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.item.select(selector)
    }

    fn texts(&self, selector: &'a Selector) -> impl Iterator<Item = String> + 'a {
        self.select(selector).map(text_of)
    }

    fn struck_texts(&self) -> impl Iterator<Item = String> + 'a {
        let selectors = self.selectors;
        self.texts(&selectors.struck)
    }

    /// Values of the first detail row whose label contains `label`, in column order.
    fn detail_column(&self, label: &str, column: usize) -> Option<String> {
        let panel = self.panel?;
        let row = panel
            .select(&self.selectors.detail_row)
            .find(|row| text_of(*row).to_lowercase().contains(label))?;
        row.select(&self.selectors.detail_value).nth(column).map(text_of)
    }

    /// Destination amount inside the bordered recipient section, struck or not.
    fn detail_recipient(&self, struck: bool) -> Option<f64> {
        let section = self.panel?.select(&self.selectors.recipient_section).next()?;
        section
            .select(&self.selectors.paragraph)
            .filter(|p| is_struck(*p) == struck)
            .map(text_of)
            .find(|text| self.currencies.mentions_destination(text))
            .map(|text| numeric_parse(&text))
    }
}

fn logo_image(view: &ItemView<'_>) -> Option<(String, Option<String>)> {
    view.select(&view.selectors.logo).find_map(|img| {
        let alt = img.value().attr("alt")?.trim();
        if alt.is_empty() {
            return None;
        }
        let logo = img.value().attr("src").map(str::to_string);
        Some((alt.to_string(), logo))
    })
}

fn score_emphasis(view: &ItemView<'_>) -> Option<f64> {
    view.texts(&view.selectors.score).next().map(|text| numeric_parse(&text))
}

// A price element shares the styling of the delivery-time label; reject anything
// quoting a currency.
fn labeled_transfer_time(view: &ItemView<'_>) -> Option<String> {
    view.texts(&view.selectors.transfer_time)
        .find(|text| !text.is_empty() && !view.currencies.mentions_any(text))
}

fn panel_promotional_fee(view: &ItemView<'_>) -> Option<f64> {
    view.detail_column("fee", 0).map(|text| fee_parse(&text))
}

fn panel_regular_fee(view: &ItemView<'_>) -> Option<f64> {
    view.detail_column("fee", 1).map(|text| fee_parse(&text))
}

fn panel_promotional_rate(view: &ItemView<'_>) -> Option<f64> {
    view.detail_column("exchange rate", 0).map(|text| numeric_parse(&text))
}

fn panel_regular_rate(view: &ItemView<'_>) -> Option<f64> {
    view.detail_column("exchange rate", 1).map(|text| numeric_parse(&text))
}

fn panel_promotional_recipient(view: &ItemView<'_>) -> Option<f64> {
    view.detail_recipient(false)
}

fn panel_regular_recipient(view: &ItemView<'_>) -> Option<f64> {
    view.detail_recipient(true)
}

fn muted_fee(view: &ItemView<'_>) -> Option<f64> {
    view.texts(&view.selectors.muted_fee)
        .find(|text| view.currencies.mentions_source(text))
        .map(|text| fee_parse(&text))
}

fn free_token_fee(view: &ItemView<'_>) -> Option<f64> {
    contains_free_token(&text_of(view.item)).then_some(0.0)
}

fn rate_emphasis(view: &ItemView<'_>) -> Option<f64> {
    view.texts(&view.selectors.rate)
        .filter(|text| !view.currencies.mentions_any(text))
        .map(|text| numeric_parse(&text))
        .find(|rate| *rate > 0.0)
}

fn bold_recipient(view: &ItemView<'_>) -> Option<f64> {
    view.select(&view.selectors.bold)
        .filter(|el| !is_struck(*el))
        .map(text_of)
        .find(|text| view.currencies.mentions_destination(text))
        .map(|text| numeric_parse(&text))
}

fn struck_fee(view: &ItemView<'_>) -> Option<f64> {
    view.struck_texts()
        .find(|text| view.currencies.mentions_source(text))
        .map(|text| numeric_parse(&text))
}

fn struck_recipient(view: &ItemView<'_>) -> Option<f64> {
    view.struck_texts()
        .find(|text| !view.currencies.mentions_source(text) && view.currencies.mentions_destination(text))
        .map(|text| numeric_parse(&text))
}

fn struck_rate(view: &ItemView<'_>) -> Option<f64> {
    view.struck_texts()
        .filter(|text| !view.currencies.mentions_any(text))
        .map(|text| numeric_parse(&text))
        .find(|rate| *rate > 0.0)
}

pub struct FieldExtractor {
    selectors: ProviderSelectors,
}

impl FieldExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            selectors: ProviderSelectors::compile()?,
        })
    }

    /// Takes one snapshot of the rendered page and extracts every provider from it.
    pub fn extract(
        &self,
        handle: &SessionHandle,
        currencies: &CurrencyPair,
    ) -> Result<Vec<RawProviderFields>> {
        let html = handle.session().content()?;
        Ok(self.extract_from_html(&html, currencies))
    }

    /// Providers in DOM order. Mobile-app promotions and items without a
    /// provider name are left out.
    pub fn extract_from_html(&self, html: &str, currencies: &CurrencyPair) -> Vec<RawProviderFields> {
        let document = Html::parse_document(html);
        let mut providers = Vec::new();

        for item in document.select(&self.selectors.item) {
            if item.select(&self.selectors.mobile_app_image).next().is_some() {
                debug!("Skipping mobile app promotion");
                continue;
            }

            let view = ItemView {
                item,
                panel: item.select(&self.selectors.detail_panel).next(),
                selectors: &self.selectors,
                currencies,
            };

            match self.read_item(&view) {
                Some(fields) => providers.push(fields),
                None => debug!("Skipping list item without a provider name"),
            }
        }

        debug!(count = providers.len(), "Extracted provider items");
        providers
    }

    fn read_item(&self, view: &ItemView<'_>) -> Option<RawProviderFields> {
        let (name, logo) = resolve(view, IDENTITY)?;

        Some(RawProviderFields {
            name: Some(name),
            logo,
            monito_score: resolve(view, SCORE),
            transfer_time: resolve(view, TRANSFER_TIME),
            best_deal: view.select(&self.selectors.best_deal).next().is_some(),
            promotional: RawPricing {
                fee: resolve(view, PROMOTIONAL_FEE),
                exchange_rate: resolve(view, PROMOTIONAL_RATE),
                recipient_gets: resolve(view, PROMOTIONAL_RECIPIENT),
            },
            regular: RawPricing {
                fee: resolve(view, REGULAR_FEE),
                exchange_rate: resolve(view, REGULAR_RATE),
                recipient_gets: resolve(view, REGULAR_RECIPIENT),
            },
        })
    }
}

//! Chat response text

pub const NO_PRODUCTS_MESSAGE: &str = "No products found matching your criteria.";

pub const NOT_UNDERSTOOD_MESSAGE: &str = "I couldn't understand the query. Could you please specify what product features you are interested in?";

pub const ERROR_MESSAGE: &str = "Error generating response. Please try again later.";

/// One `"{title}, Price: {price}"` line per product, or the no-results message
pub fn format_products<'a, I>(products: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let lines: Vec<String> = products
        .into_iter()
        .map(|(title, price)| format!("{}, Price: {}", title, price))
        .collect();

    if lines.is_empty() {
        NO_PRODUCTS_MESSAGE.to_string()
    } else {
        lines.join("\n")
    }
}

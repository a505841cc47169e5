use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::db::BookRow;
use crate::error::ScrapeError;

static ENTRY: LazyLock<Selector> = LazyLock::new(|| sel("article.product_pod"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| sel("h3 a"));
static PRICE: LazyLock<Selector> = LazyLock::new(|| sel("p.price_color"));
static AVAILABILITY: LazyLock<Selector> = LazyLock::new(|| sel("p.instock.availability"));
static RATING: LazyLock<Selector> = LazyLock::new(|| sel("p.star-rating"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| sel("img"));

fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Parse the fetched catalog page and extract every book entry in document
/// order. The first entry missing a required structural element aborts the
/// whole batch; no partial silent skipping.
pub fn extract_books(html: &str, base_url: &str) -> Result<Vec<BookRow>, ScrapeError> {
    let doc = Html::parse_document(html);
    doc.select(&ENTRY)
        .map(|entry| extract_one(entry, base_url))
        .collect()
}

fn extract_one(entry: ElementRef, base_url: &str) -> Result<BookRow, ScrapeError> {
    let title = require(entry, &TITLE_LINK, "title")?
        .value()
        .attr("title")
        .filter(|t| !t.is_empty())
        .ok_or(ScrapeError::MalformedEntry { field: "title" })?
        .to_string();

    // Verbatim, currency symbol included. Numeric coercion is a read-side
    // concern (see analyze::parse_price).
    let price = text_of(require(entry, &PRICE, "price")?);

    let availability = text_of(require(entry, &AVAILABILITY, "availability")?)
        .trim()
        .to_string();

    // Second class token of the rating marker, e.g. "star-rating Three".
    // Positional: the label is not checked against a rating vocabulary.
    let rating = require(entry, &RATING, "rating")?
        .value()
        .attr("class")
        .and_then(|c| c.split_whitespace().nth(1))
        .ok_or(ScrapeError::MalformedEntry { field: "rating" })?
        .to_string();

    let src = require(entry, &IMAGE, "image_url")?
        .value()
        .attr("src")
        .ok_or(ScrapeError::MalformedEntry { field: "image_url" })?;
    // Plain concatenation onto the catalog base; ../ segments are kept as-is.
    let image_url = format!("{}{}", base_url, src);

    // The listing page carries no description, so the title stands in until
    // detail pages are scraped.
    let description = title.clone();

    Ok(BookRow {
        title,
        price,
        availability,
        rating,
        description,
        image_url,
    })
}

fn require<'a>(
    entry: ElementRef<'a>,
    selector: &Selector,
    field: &'static str,
) -> Result<ElementRef<'a>, ScrapeError> {
    entry
        .select(selector)
        .next()
        .ok_or(ScrapeError::MalformedEntry { field })
}

fn text_of(el: ElementRef) -> String {
    el.text().collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://books.toscrape.com/";

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/catalog.html").unwrap()
    }

    #[test]
    fn extracts_every_entry_in_order() {
        let books = extract_books(&fixture(), BASE).unwrap();
        assert_eq!(books.len(), 3);
        assert_eq!(books[0].title, "A Light in the Attic");
        assert_eq!(books[1].title, "Tipping the Velvet");
        assert_eq!(books[2].title, "Soumission");
    }

    #[test]
    fn fields_survive_verbatim() {
        let books = extract_books(&fixture(), BASE).unwrap();
        let b = &books[0];
        assert_eq!(b.price, "£51.77");
        assert_eq!(b.availability, "In stock");
        assert_eq!(b.rating, "Three");
        assert_eq!(b.image_url, format!("{}media/cache/x.jpg", BASE));
    }

    #[test]
    fn rating_is_the_second_class_token() {
        let books = extract_books(&fixture(), BASE).unwrap();
        let ratings: Vec<&str> = books.iter().map(|b| b.rating.as_str()).collect();
        assert_eq!(ratings, ["Three", "One", "Five"]);
    }

    #[test]
    fn description_mirrors_title() {
        let books = extract_books(&fixture(), BASE).unwrap();
        assert!(books.iter().all(|b| b.description == b.title));
    }

    #[test]
    fn page_without_entries_yields_nothing() {
        let books = extract_books("<html><body><p>no catalog here</p></body></html>", BASE)
            .unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn missing_price_fails_fast() {
        let html = r##"
            <article class="product_pod">
              <img src="media/a.jpg">
              <p class="star-rating One"></p>
              <h3><a href="#" title="No Price Here">No Price...</a></h3>
              <p class="instock availability">In stock</p>
            </article>"##;
        let err = extract_books(html, BASE).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedEntry { field: "price" }));
    }

    #[test]
    fn missing_title_attribute_fails() {
        let html = r##"
            <article class="product_pod">
              <img src="media/a.jpg">
              <p class="star-rating One"></p>
              <h3><a href="#">Untitled</a></h3>
              <p class="price_color">£9.99</p>
              <p class="instock availability">In stock</p>
            </article>"##;
        let err = extract_books(html, BASE).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedEntry { field: "title" }));
    }

    #[test]
    fn malformed_entry_aborts_the_batch() {
        // Second entry lacks its rating marker; the good first entry must
        // not leak through.
        let html = r##"
            <article class="product_pod">
              <img src="media/a.jpg">
              <p class="star-rating Two"></p>
              <h3><a href="#" title="Good Entry">Good Entry</a></h3>
              <p class="price_color">£5.00</p>
              <p class="instock availability">In stock</p>
            </article>
            <article class="product_pod">
              <img src="media/b.jpg">
              <h3><a href="#" title="Bad Entry">Bad Entry</a></h3>
              <p class="price_color">£6.00</p>
              <p class="instock availability">In stock</p>
            </article>"##;
        let err = extract_books(html, BASE).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedEntry { field: "rating" }));
    }
}

//! Product-line answers rendered as a markdown table plus a link list.
//!
//! Input lines look like
//! `Nike Pegasus (Women): Rs. 5000 (20 percent off), Rating: 4.5, <link>, 2024-05-01T10:00:00`.
//! Parsing is tolerant: any field that cannot be found renders as `NA`
//! (discount as `0%`), and lines without `": Rs. "` are skipped.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use regex::Regex;

const PRICE_MARKER: &str = ": Rs. ";
const NA: &str = "NA";

const HEADER: &str = "| Product | Price | Discount | Rating | Scraped Date |\n";
const SEPARATOR: &str = "|---------|-------|----------|--------|-------------|\n";

/// One parsed product line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub name: String,
    pub price: String,
    pub discount: String,
    pub rating: String,
    pub scraped: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    enumerator: Regex,
    gender: Regex,
    price: Regex,
    discount: Regex,
    rating: Regex,
    /// Link alternatives in priority order.
    links: [Regex; 3],
    timestamp: Regex,
}

impl ResponseFormatter {
    /// `domain_marker` identifies bracketed catalog links that lack a scheme.
    pub fn new(domain_marker: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            enumerator: Regex::new(r"^\d+[.)]\s+")?,
            gender: Regex::new(r"\s*\((Men|Women|Unisex|Kids)\)")?,
            price: Regex::new(r"^(\d+)")?,
            discount: Regex::new(r"(\d+)\s*percent off")?,
            rating: Regex::new(r"Rating:\s*([^\s,]+)")?,
            links: [
                Regex::new(r"\[(https?://[^\]]+)\]")?,
                Regex::new(r"https?://[^\s,\]]+")?,
                Regex::new(&format!(r"\[([^\]]*{}[^\]]*)\]", regex::escape(domain_marker)))?,
            ],
            timestamp: Regex::new(r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2})")?,
        })
    }

    /// True when at least one line carries the product price marker.
    pub fn has_product_lines(&self, raw: &str) -> bool {
        raw.lines().any(|l| l.contains(PRICE_MARKER))
    }

    /// Parses one line; `None` when it is not a product line.
    pub fn parse_line(&self, line: &str) -> Option<ProductRow> {
        if line.trim().is_empty() {
            return None;
        }
        let mut parts = line.split(PRICE_MARKER);
        let head = parts.next()?;
        let rest = parts.next()?;

        let head = self.enumerator.replace(head.trim(), "");
        let name = self.gender.replace_all(&head, "").trim().to_string();

        let price = self
            .price
            .captures(rest)
            .map_or_else(|| NA.to_string(), |c| format!("Rs. {}", &c[1]));
        let discount = self
            .discount
            .captures(rest)
            .map_or_else(|| "0%".to_string(), |c| format!("{}%", &c[1]));
        let rating = self
            .rating
            .captures(rest)
            .map_or_else(|| NA.to_string(), |c| c[1].to_string());
        let scraped = self
            .timestamp
            .captures(rest)
            .and_then(|c| NaiveDateTime::parse_from_str(&c[1], "%Y-%m-%dT%H:%M:%S").ok())
            .map_or_else(|| NA.to_string(), |dt| dt.format("%b %d, %Y %I:%M %p").to_string());

        Some(ProductRow {
            name,
            price,
            discount,
            rating,
            scraped,
            link: self.link(line),
        })
    }

    /// First link found by the ordered alternatives, brackets stripped.
    fn link(&self, line: &str) -> Option<String> {
        self.links.iter().find_map(|re| {
            let caps = re.captures(line)?;
            let m = caps.get(1).or_else(|| caps.get(0))?;
            let url = m.as_str().trim_matches(|c| c == '[' || c == ']');
            (!url.is_empty()).then(|| url.to_string())
        })
    }

    /// Renders every product line of `raw` in input order.
    ///
    /// Always returns a table; it has no rows when nothing matched.
    pub fn format(&self, raw: &str) -> String {
        let rows: Vec<ProductRow> = raw.trim().lines().filter_map(|l| self.parse_line(l)).collect();

        let mut out = String::with_capacity(HEADER.len() + SEPARATOR.len() + rows.len() * 96);
        out.push_str(HEADER);
        out.push_str(SEPARATOR);
        for r in &rows {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                r.name, r.price, r.discount, r.rating, r.scraped
            );
        }

        out.push_str("\n**Product Links:**\n\n");
        let links: Vec<&str> = rows.iter().filter_map(|r| r.link.as_deref()).collect();
        if links.is_empty() {
            out.push_str("No links found in response.\n");
        } else {
            for (i, link) in links.iter().enumerate() {
                let _ = writeln!(out, "{}. {link}", i + 1);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt() -> ResponseFormatter {
        ResponseFormatter::new("myntra").unwrap()
    }

    #[test]
    fn renders_reference_line() {
        let raw = "Nike Pegasus (Women): Rs. 5000 (20 percent off), Rating: 4.5, https://x.com/p, 2024-05-01T10:00:00";
        let out = fmt().format(raw);
        assert!(out.starts_with(HEADER));
        assert!(out.contains("| Nike Pegasus | Rs. 5000 | 20% | 4.5 | May 01, 2024 10:00 AM |\n"));
        assert!(out.ends_with("**Product Links:**\n\n1. https://x.com/p\n"));
    }

    #[test]
    fn skips_non_product_lines_and_keeps_order() {
        let raw = "Here are some options:\n\n\
                   1. Puma Velocity (Men): Rs. 2000 (50 percent off), Rating: 4.1, https://www.myntra.com/2, 2024-05-02T18:30:00\n\
                   2. Asics Gel (Unisex): Rs. 9000 (0 percent off), Rating: NA, [https://www.myntra.com/3], 2024-05-03T09:05:00\n\
                   Enjoy!";
        let out = fmt().format(raw);
        let body: Vec<&str> = out.lines().skip(2).take_while(|l| l.starts_with('|')).collect();
        assert_eq!(
            body,
            [
                "| Puma Velocity | Rs. 2000 | 50% | 4.1 | May 02, 2024 06:30 PM |",
                "| Asics Gel | Rs. 9000 | 0% | NA | May 03, 2024 09:05 AM |",
            ]
        );
        assert!(out.contains("1. https://www.myntra.com/2\n2. https://www.myntra.com/3\n"));
    }

    #[test]
    fn missing_fields_fall_back() {
        let row = fmt()
            .parse_line("Bata Loafers (Kids): Rs. NA (NA percent off), Rating: , [www.myntra.com/shoes/1], scraped recently")
            .unwrap();
        assert_eq!(row.name, "Bata Loafers");
        assert_eq!(row.price, "NA");
        assert_eq!(row.discount, "0%");
        assert_eq!(row.rating, "NA");
        assert_eq!(row.scraped, "NA");
        assert_eq!(row.link.as_deref(), Some("www.myntra.com/shoes/1"));
    }

    #[test]
    fn invalid_timestamp_is_na() {
        let row = fmt()
            .parse_line("X Y (Men): Rs. 10 (5 percent off), Rating: 3, 2024-13-45T10:00:00")
            .unwrap();
        assert_eq!(row.scraped, "NA");
        assert_eq!(row.link, None);
    }

    #[test]
    fn no_product_lines_still_yields_a_table() {
        let f = fmt();
        let raw = "The most expensive shoe on sale costs Rs.21499.";
        assert!(!f.has_product_lines(raw));
        assert_eq!(
            f.format(raw),
            format!("{HEADER}{SEPARATOR}\n**Product Links:**\n\nNo links found in response.\n")
        );
        assert_eq!(f.format(""), f.format("   \n"));
    }

    #[test]
    fn link_alternatives_are_tried_in_priority_order() {
        let f = fmt();
        let bracketed = f
            .parse_line("A (Men): Rs. 1, https://a.com/x, [https://b.com/y]")
            .unwrap();
        assert_eq!(bracketed.link.as_deref(), Some("https://b.com/y"));

        let bare = f.parse_line("B (Men): Rs. 1, see https://c.com/z] now").unwrap();
        assert_eq!(bare.link.as_deref(), Some("https://c.com/z"));

        let marker = f
            .parse_line("C (Men): Rs. 1, [www.myntra.com/c] or https://d.com/w")
            .unwrap();
        assert_eq!(marker.link.as_deref(), Some("https://d.com/w"));
    }

    #[test]
    fn domain_marker_is_configurable() {
        let f = ResponseFormatter::new("zappos").unwrap();
        let row = f.parse_line("A B: Rs. 1, [zappos.com/x]").unwrap();
        assert_eq!(row.link.as_deref(), Some("zappos.com/x"));
        assert_eq!(fmt().parse_line("A B: Rs. 1, [zappos.com/x]").unwrap().link, None);
    }
}

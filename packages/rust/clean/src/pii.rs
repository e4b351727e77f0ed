//! Pattern-based PII redaction.
//!
//! Email first, then card numbers, then phone numbers — card and phone
//! patterns can overlap on the same digit run, and the card match must win.
//! Patterns are length/format-constrained on purpose: recipe text is full
//! of short numeric spans ("10-12 minutes", "1/2 cup") that must survive,
//! so recall is traded for precision.

use regex::Regex;

use corpuskit_shared::MASK_TOKEN;

/// Compiled PII patterns, applied in fixed order by [`PiiMasker::mask`].
#[derive(Debug, Clone)]
pub struct PiiMasker {
    email: Regex,
    card: Regex,
    phone: Regex,
}

impl Default for PiiMasker {
    fn default() -> Self {
        Self {
            email: Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}")
                .expect("valid regex"),
            card: Regex::new(r"\b(?:\d[ -]*?){13,19}\b").expect("valid regex"),
            phone: Regex::new(
                r"\b(?:\+?\d{1,3}[-.\s]?)?(?:\(?\d{2,4}\)?[-.\s]?)?\d{3}[-.\s]?\d{4}\b",
            )
            .expect("valid regex"),
        }
    }
}

impl PiiMasker {
    /// Replace every detected email, card number, and phone number with the
    /// fixed mask token.
    pub fn mask(&self, content: &str) -> String {
        let masked = self.email.replace_all(content, MASK_TOKEN);
        let masked = self.card.replace_all(&masked, MASK_TOKEN);
        self.phone.replace_all(&masked, MASK_TOKEN).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_email_addresses() {
        let m = PiiMasker::default();
        assert_eq!(
            m.mask("Questions? Write to chef.anna+blog@example.co.uk anytime."),
            "Questions? Write to xxx anytime."
        );
    }

    #[test]
    fn masks_phone_numbers() {
        let m = PiiMasker::default();
        let out = m.mask("Call 555-123-4567 to reserve.");
        assert_eq!(out, "Call xxx to reserve.");
    }

    #[test]
    fn card_pattern_wins_over_phone() {
        let m = PiiMasker::default();
        let out = m.mask("Card on file: 1234 5678 9012 3456.");
        assert_eq!(out, "Card on file: xxx.");
    }

    #[test]
    fn recipe_quantities_survive() {
        let m = PiiMasker::default();
        let text = "Simmer for 10-12 minutes, then add 1/2 cup of stock.";
        assert_eq!(m.mask(text), text);
    }

    #[test]
    fn mask_token_is_exactly_xxx() {
        let m = PiiMasker::default();
        let out = m.mask("email me at a@b.io");
        assert!(out.ends_with("xxx"));
        assert!(!out.contains("xxxx"));
    }
}

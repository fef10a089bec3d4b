//! Registry of supported payout banks and their CBN routing codes

use serde::Serialize;

/// A bank vendors can be paid into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bank {
    pub name: &'static str,
    pub code: &'static str,
}

impl Bank {
    /// Short name shown in parentheses, e.g. "GTBank" for
    /// "Guaranty Trust Bank (GTBank)"
    pub fn short_name(&self) -> Option<&'static str> {
        let start = self.name.find('(')?;
        let end = self.name.rfind(')')?;
        (end > start + 1).then(|| &self.name[start + 1..end])
    }
}

static NIGERIAN_BANKS: [Bank; 19] = [
    Bank { name: "Access Bank", code: "044" },
    Bank { name: "Citibank Nigeria", code: "023" },
    Bank { name: "Ecobank Nigeria", code: "050" },
    Bank { name: "Fidelity Bank", code: "070" },
    Bank { name: "First Bank of Nigeria", code: "011" },
    Bank { name: "First City Monument Bank (FCMB)", code: "214" },
    Bank { name: "Guaranty Trust Bank (GTBank)", code: "058" },
    Bank { name: "Heritage Bank", code: "030" },
    Bank { name: "Keystone Bank", code: "082" },
    Bank { name: "Polaris Bank", code: "076" },
    Bank { name: "Providus Bank", code: "101" },
    Bank { name: "Stanbic IBTC Bank", code: "221" },
    Bank { name: "Standard Chartered Bank", code: "068" },
    Bank { name: "Sterling Bank", code: "232" },
    Bank { name: "Union Bank of Nigeria", code: "032" },
    Bank { name: "United Bank for Africa (UBA)", code: "033" },
    Bank { name: "Unity Bank", code: "215" },
    Bank { name: "Wema Bank", code: "035" },
    Bank { name: "Zenith Bank", code: "057" },
];

/// All banks, in display order
pub fn all() -> &'static [Bank] {
    &NIGERIAN_BANKS
}

/// Look a bank up by its full or short name, ignoring case and surrounding
/// whitespace
pub fn find_by_name(name: &str) -> Option<&'static Bank> {
    let needle = name.trim();
    if needle.is_empty() {
        return None;
    }

    NIGERIAN_BANKS.iter().find(|bank| {
        bank.name.eq_ignore_ascii_case(needle)
            || bank
                .short_name()
                .is_some_and(|short| short.eq_ignore_ascii_case(needle))
    })
}

/// Look a bank up by routing code
pub fn find_by_code(code: &str) -> Option<&'static Bank> {
    let code = code.trim();
    NIGERIAN_BANKS.iter().find(|bank| bank.code == code)
}

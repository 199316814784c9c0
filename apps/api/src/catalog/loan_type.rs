/// Turns a URL slug into the label stored in `bank_loans.loan_type`:
/// `homeLoan` → `Home Loan`, `car` → `Car Loan`, `personal-loan` →
/// `Personal Loan`.
pub fn normalize_loan_type(slug: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in slug.trim().chars() {
        if ch == '-' || ch == '_' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        // Split camelCase at a lower→upper transition only, so "GOLD" stays whole.
        if ch.is_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut words: Vec<String> = words.iter().map(|w| capitalize(w)).collect();
    if words.last().map(|w| w != "Loan").unwrap_or(false) {
        words.push("Loan".to_string());
    }
    words.join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

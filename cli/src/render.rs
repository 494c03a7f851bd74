//! Plain-text rendering for verdicts and rule listings.
//!
//! Every function returns a `String`; callers decide where it goes.

use bracket_core::{CategorySet, Deck, Limit, RuleModel, Tier, TierId, Verdict};

/// `∞` for unlimited, the number otherwise.
pub fn format_limit(limit: Limit) -> String {
    match limit {
        Limit::Finite(n) => n.to_string(),
        Limit::Unlimited => "∞".to_string(),
    }
}

fn bullets<'a>(lines: &mut Vec<String>, items: impl IntoIterator<Item = &'a String>) {
    lines.extend(items.into_iter().map(|item| format!("  • {item}")));
}

fn push_counts(lines: &mut Vec<String>, verdict: &Verdict) {
    lines.push("Card Counts:".to_string());
    for (category, count) in &verdict.category_counts {
        lines.push(format!("  • {}: {count}", category.display_name()));
    }
}

/// Render the analysis of `deck` for a terminal.
pub fn render_verdict(deck: &Deck, verdict: &Verdict) -> String {
    let mut lines = vec![format!("Deck: {}", deck.name)];
    if !deck.commanders.is_empty() {
        lines.push(format!("Commander(s): {}", deck.commanders.join(", ")));
    }
    if !deck.source.is_empty() {
        lines.push(format!("Source: {}", deck.source));
    }
    lines.push(format!(
        "Cards: {} + {} commander(s)",
        deck.card_count(),
        deck.commander_count()
    ));
    lines.push(String::new());

    match (verdict.tier, &verdict.tier_name) {
        (Some(id), Some(name)) => {
            lines.push(format!("Bracket {id}: {name}"));
            lines.push(String::new());
            push_counts(&mut lines, verdict);
            for (category, cards) in &verdict.found_cards {
                if cards.is_empty() {
                    continue;
                }
                lines.push(String::new());
                lines.push(format!("{} found:", category.display_name()));
                bullets(&mut lines, cards);
            }
        }
        _ => {
            lines.push("No Valid Bracket".to_string());
            lines.push(format!("Reason: {}", verdict.reason));
            if verdict.has_banned_cards() {
                lines.push(String::new());
                lines.push("Banned Cards:".to_string());
                bullets(&mut lines, &verdict.banned_cards_found);
            }
            if verdict.has_violations() {
                lines.push(String::new());
                lines.push("Violations:".to_string());
                bullets(&mut lines, &verdict.violations);
            }
            if !verdict.category_counts.is_empty() {
                lines.push(String::new());
                push_counts(&mut lines, verdict);
            }
        }
    }

    if let Some(claimed) = deck.source_bracket {
        lines.push(String::new());
        lines.push(format!("Source reports bracket {claimed} (not used for classification)"));
    }

    lines.join("\n")
}

/// One tier with its limits and bans.
pub fn render_tier(id: TierId, tier: &Tier) -> String {
    let mut lines = vec![format!("Bracket {id}: {}", tier.name)];
    if !tier.description.is_empty() {
        lines.push(tier.description.clone());
    }
    for (category, limit) in &tier.limits {
        lines.push(format!(
            "  • {}: {}",
            category.display_name(),
            format_limit(*limit)
        ));
    }
    if !tier.banned_cards.is_empty() {
        lines.push(format!("  Banned: {}", tier.banned_cards.join(", ")));
    }
    lines.join("\n")
}

pub fn render_tiers(rules: &RuleModel) -> String {
    let mut blocks: Vec<String> = rules
        .tiers()
        .map(|(id, tier)| render_tier(id, tier))
        .collect();
    if blocks.is_empty() {
        blocks.push("No brackets defined".to_string());
    }
    blocks.join("\n\n")
}

pub fn render_banlist(bans: &[String]) -> String {
    if bans.is_empty() {
        return "Global ban list is empty".to_string();
    }
    let mut lines = vec![format!("Globally banned ({}):", bans.len())];
    bullets(&mut lines, bans);
    lines.join("\n")
}

pub fn render_categories(categories: &CategorySet) -> String {
    let mut lines = Vec::new();
    for (key, cards) in categories.iter() {
        let kind = if key.is_builtin() { "built-in" } else { "custom" };
        lines.push(format!(
            "{} [{key}] ({kind}, {} cards)",
            key.display_name(),
            cards.len()
        ));
        for card in cards {
            match card.external_id() {
                Some(id) => lines.push(format!("  • {} ({id})", card.card_name())),
                None => lines.push(format!("  • {}", card.card_name())),
            }
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use bracket_core::{BuiltinCategory, analyze, default_rule_model};
    use pretty_assertions::assert_eq;

    fn deck(cards: &[&str]) -> Deck {
        Deck::new(
            "Kinnan Turbo",
            vec!["Kinnan, Bonder Prodigy".into()],
            cards.iter().map(|c| (*c).to_string()).collect(),
        )
        .with_source("moxfield")
    }

    #[test]
    fn fit_shows_bracket_counts_and_found_cards() {
        let rules = default_rule_model().expect("defaults");
        let d = deck(&["Demonic Tutor", "Island"]);
        let text = render_verdict(&d, &analyze(&d, &rules));
        assert!(text.starts_with(
            "Deck: Kinnan Turbo\nCommander(s): Kinnan, Bonder Prodigy\nSource: moxfield\n\
             Cards: 2 + 1 commander(s)\n"
        ));
        assert!(text.contains("Bracket 4: Bracket 4"), "{text}");
        assert!(text.contains("  • Two Card Combos: 0"), "{text}");
        assert!(text.contains("Tutors found:\n  • Demonic Tutor"), "{text}");
        assert!(!text.contains("Land Denial found"), "{text}");
    }

    #[test]
    fn banned_deck_lists_cards_without_counts() {
        let rules = default_rule_model().expect("defaults");
        let d = deck(&["Black Lotus"]);
        let text = render_verdict(&d, &analyze(&d, &rules));
        assert!(text.contains("No Valid Bracket\nReason: Contains globally banned cards"));
        assert!(text.contains("Banned Cards:\n  • Black Lotus"));
        assert!(!text.contains("Card Counts"));
    }

    #[test]
    fn source_bracket_is_only_a_hint() {
        let rules = default_rule_model().expect("defaults");
        let mut d = deck(&[]);
        d.source_bracket = Some(2);
        let verdict = analyze(&d, &rules);
        assert_eq!(verdict.tier, Some(4));
        assert!(
            render_verdict(&d, &verdict)
                .ends_with("Source reports bracket 2 (not used for classification)")
        );
    }

    #[test]
    fn unlimited_renders_as_infinity() {
        let rules = default_rule_model().expect("defaults");
        let top = rules.tier(4).expect("bracket 4");
        let text = render_tier(4, top);
        assert!(text.contains("  • Tutors: ∞"), "{text}");
        assert_eq!(format_limit(Limit::Finite(3)), "3");
        assert_eq!(
            format_limit(top.limit_for(&BuiltinCategory::LandDenial.into())),
            "∞"
        );
    }
}

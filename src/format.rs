use crate::data_mapper::PlayerEntry;

/// Ratio of `part` to `whole`, 0 when `whole` is 0.
pub fn share(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(whole)
}

/// Renders a ratio with two decimals, `0.5` becomes `50.00%`. Halves
/// round up, so `1/32` is `3.13%`.
pub fn percentage(ratio: f64) -> String {
    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    format!("{:.2}%", (ratio * 10000.0).round() / 100.0)
}

pub fn pluralize(count: u32, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 { singular } else { plural }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChordInfo {
    /// Self chord: goals the player scored with no assist.
    Unassisted { name: String, share: f64 },
    /// Chord between two players. Each share is the connection count over
    /// that player's own point total.
    Shared {
        source_name: String,
        target_name: String,
        source_share: f64,
        target_share: f64,
    },
}

pub fn player_info_text(player: &PlayerEntry) -> String {
    format!(
        "{} {} (scored {} of goals)\n{} {} (involved in {} of goals)",
        player.goals,
        pluralize(player.goals, "goal", "goals"),
        percentage(player.goal_share),
        player.points,
        pluralize(player.points, "point", "points"),
        percentage(player.involvement_share),
    )
}

pub fn chord_info_text(info: &ChordInfo) -> String {
    match info {
        ChordInfo::Unassisted { name, share } => format!(
            "{name} scored {} of their points without assistance.",
            percentage(*share)
        ),
        ChordInfo::Shared {
            source_name,
            target_name,
            source_share,
            target_share,
        } => format!(
            "{source_name} scored {} of their points with {target_name}\n\
             {target_name} scored {} of their points with {source_name}",
            percentage(*source_share),
            percentage(*target_share),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(goals: u32, points: u32, total: u32) -> PlayerEntry {
        PlayerEntry {
            name: "Kunitz".to_string(),
            connections: Vec::new(),
            goals,
            points,
            goal_share: share(goals, total),
            involvement_share: share(points, total),
        }
    }

    #[test]
    fn share_of_zero_is_zero() {
        assert_eq!(share(3, 0), 0.0);
        assert_eq!(share(0, 0), 0.0);
        assert!((share(1, 4) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn percentage_uses_two_decimals() {
        assert_eq!(percentage(0.5), "50.00%");
        assert_eq!(percentage(1.0 / 3.0), "33.33%");
        assert_eq!(percentage(0.0), "0.00%");
        assert_eq!(percentage(f64::NAN), "0.00%");
        assert_eq!(percentage(1.0 / 32.0), "3.13%");
        assert_eq!(percentage(2.0 / 3.0), "66.67%");
    }

    #[test]
    fn singular_wording_for_exactly_one() {
        let text = player_info_text(&entry(1, 1, 4));
        assert_eq!(
            text,
            "1 goal (scored 25.00% of goals)\n1 point (involved in 25.00% of goals)"
        );
    }

    #[test]
    fn plural_wording_for_zero_and_many() {
        let text = player_info_text(&entry(0, 2, 4));
        assert!(text.starts_with("0 goals (scored 0.00% of goals)\n"));
        assert!(text.ends_with("2 points (involved in 50.00% of goals)"));
    }

    #[test]
    fn chord_text_for_both_shapes() {
        let solo = ChordInfo::Unassisted {
            name: "Kessel".to_string(),
            share: 0.25,
        };
        assert_eq!(
            chord_info_text(&solo),
            "Kessel scored 25.00% of their points without assistance."
        );

        let pair = ChordInfo::Shared {
            source_name: "Crosby".to_string(),
            target_name: "Guentzel".to_string(),
            source_share: 0.5,
            target_share: 1.0,
        };
        assert_eq!(
            chord_info_text(&pair),
            "Crosby scored 50.00% of their points with Guentzel\n\
             Guentzel scored 100.00% of their points with Crosby"
        );
    }
}

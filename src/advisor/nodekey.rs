use super::classify::classify_spr_bin;
use super::classify::SprBin;
use super::observation::Observation;

/// Lowercases and folds anything outside `[a-z0-9_+-]` into `_`.
pub fn slug(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() => c,
            '_' | '-' | '+' => c,
            _ => '_',
        })
        .collect()
}

/// Canonical policy-table key for a decision point.
///
/// `street|pot_type|role|ip|texture=T|spr=S|facing=F|hand=H`, with the
/// fourth field `ip` or `oop`. Unknown parts render as `na`.
pub fn node_key_from_observation(obs: &Observation) -> String {
    let spr = match obs.street.is_postflop() {
        true => classify_spr_bin(obs.spr, Some(obs.spr_bucket.as_str())),
        false => SprBin::Na,
    };
    [
        slug(&obs.street.to_string()),
        slug(obs.pot_type.as_str()),
        slug(obs.role.as_str()),
        String::from(if obs.ip { "ip" } else { "oop" }),
        format!("texture={}", slug(obs.board_texture.as_str())),
        format!("spr={}", spr),
        format!("facing={}", slug(obs.facing_size_tag.as_str())),
        format!("hand={}", slug(obs.hand_class.as_str())),
    ]
    .join("|")
}

/// Keys to try against a policy table, most specific first.
///
/// The exact key, then with the alternate `two_third+` spelling, then
/// with `facing=na`. A key without a facing field gets one.
pub fn candidate_keys(key: &str) -> Vec<String> {
    let mut parts = key.split('|').map(String::from).collect::<Vec<_>>();
    if !parts.iter().any(|p| p.starts_with("facing=")) {
        let at = parts.iter().position(|p| p.starts_with("hand=")).unwrap_or(parts.len());
        parts.insert(at, String::from("facing=na"));
    }
    let with = |facing: &str| {
        parts
            .iter()
            .map(|p| match p.starts_with("facing=") {
                true => format!("facing={}", facing),
                false => p.clone(),
            })
            .collect::<Vec<_>>()
            .join("|")
    };
    let facing = parts
        .iter()
        .find_map(|p| p.strip_prefix("facing="))
        .unwrap_or("na")
        .to_string();
    let alias = match facing.as_str() {
        "two_third+" => Some("two_third_plus"),
        "two_third_plus" => Some("two_third+"),
        _ => None,
    };
    let mut keys = vec![with(&facing)];
    keys.extend(alias.map(|a| with(a)));
    keys.push(with("na"));
    keys.into_iter().fold(Vec::new(), |mut acc, k| {
        if !acc.contains(&k) {
            acc.push(k);
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::config::Strategy;
    use crate::advisor::profile::Bundle;
    use crate::cards::Bitwise;
    use crate::cards::Card;
    use crate::gameplay::Action;
    use crate::gameplay::HandState;
    use crate::gameplay::SessionConfig;
    use std::sync::Arc;

    fn observe(state: &HandState) -> Observation {
        let bundle = Arc::new(Bundle::builtin(Strategy::Medium));
        Observation::build(state, state.to_act(), &state.legal(), bundle, &Bitwise).0
    }

    fn start(seed: u64) -> HandState {
        HandState::start(&SessionConfig::default(), "s", "h", 0, Some(seed)).unwrap()
    }

    /// preflop keys carry spr=na and facing for the blind
    #[test]
    fn preflop_key() {
        let state = start(3).with_cards([Card::parse("AhKh").unwrap(), Card::parse("7c2d").unwrap()], vec![]);
        assert_eq!(
            node_key_from_observation(&observe(&state)),
            "preflop|limped|na|oop|texture=na|spr=na|facing=third|hand=Ax_suited".to_lowercase()
        );
    }

    /// an empty pot still renders spr=na
    #[test]
    fn empty_pot_spr() {
        let mut obs = observe(&start(3));
        obs.pot_now = 0;
        obs.spr = None;
        assert!(node_key_from_observation(&obs).contains("|spr=na|"));
    }

    /// the same seed and line give the same key
    #[test]
    fn deterministic() {
        let line = |seed| {
            start(seed)
                .try_apply(Action::Raise, Some(5))
                .and_then(|s| s.try_apply(Action::Call, None))
                .map(|s| node_key_from_observation(&observe(&s)))
                .unwrap()
        };
        assert_eq!(line(11), line(11));
        assert!(line(11).starts_with("flop|single_raised|caller|oop|texture="));
    }

    /// alias and facing=na fallbacks follow the exact key
    #[test]
    fn candidates() {
        let keys = candidate_keys("flop|single_raised|pfr|ip|texture=dry|spr=spr6|facing=two_third+|hand=strong_draw");
        assert_eq!(keys.len(), 3);
        assert!(keys[1].contains("facing=two_third_plus"));
        assert!(keys[2].contains("facing=na"));
        let keys = candidate_keys("turn|limped|na|oop|texture=wet|spr=spr2|hand=air");
        assert_eq!(keys, vec!["turn|limped|na|oop|texture=wet|spr=spr2|facing=na|hand=air"]);
    }

    /// slugs keep the allowed punctuation
    #[test]
    fn slugs() {
        assert_eq!(slug(" Two Third+ "), "two_third+");
        assert_eq!(slug("a/b.c"), "a_b_c");
    }
}

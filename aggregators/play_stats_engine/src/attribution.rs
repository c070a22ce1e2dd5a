use crate::types::{Play, PlayType, PlayerId, Side, TeamRef};

pub const TOUCHDOWN_POINTS: u32 = 6;
pub const SAFETY_POINTS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum AttributionError {
    #[error("play has no possessing team")]
    MissingPossession,
    #[error("possessing team '{0}' is not one of the match teams")]
    UnknownTeam(String),
    #[error("unknown play type '{0}'")]
    UnknownPlayType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchdownKind {
    Pass,
    Run,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    PassAttempt,
    PassCompletion,
    PassTouchdown,
    RunAttempt,
    RunTouchdown,
    Reception,
    ReceptionTouchdown,
    Interception,
    Sack,
    Tackle,
    /// One-point conversion, counted for the thrower.
    ConversionOnePoint,
    /// Two-point conversion, counted for the thrower.
    ConversionTwoPoint,
    ConversionCatch,
    Safety,
    Points,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credit {
    pub side: Side,
    pub player: Option<PlayerId>,
    pub category: Category,
    pub delta: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub offense: Side,
    pub credits: Vec<Credit>,
}

impl Attribution {
    /// Points this play is worth, whichever team receives them.
    pub fn points(&self) -> u32 {
        self.credits
            .iter()
            .filter(|c| c.category == Category::Points)
            .map(|c| c.delta)
            .sum()
    }
}

struct CreditList {
    credits: Vec<Credit>,
}

impl CreditList {
    fn new() -> Self {
        Self { credits: Vec::new() }
    }

    fn add(&mut self, side: Side, player: Option<&PlayerId>, category: Category) {
        self.add_delta(side, player, category, 1);
    }

    fn add_delta(&mut self, side: Side, player: Option<&PlayerId>, category: Category, delta: u32) {
        self.credits.push(Credit {
            side,
            player: player.cloned(),
            category,
            delta,
        });
    }
}

/// Maps the possessing team reference onto a side of the match.
pub fn possession_side(play: &Play, local: &TeamRef, visitor: &TeamRef) -> Result<Side, AttributionError> {
    let possessing = play
        .possessing_team
        .as_deref()
        .filter(|team| !team.is_empty())
        .ok_or(AttributionError::MissingPossession)?;

    if possessing == local.id {
        Ok(Side::Local)
    } else if possessing == visitor.id {
        Ok(Side::Visitor)
    } else {
        Err(AttributionError::UnknownTeam(possessing.to_string()))
    }
}

/// Classifies a generic `touchdown` play from its free-text description.
///
/// Any description containing "pase" counts as a passing touchdown, anything
/// else as a run. This misreads descriptions that mention "pase" in passing;
/// it is kept as-is until plays carry an explicit touchdown kind.
pub fn classify_generic_touchdown(description: &str) -> TouchdownKind {
    if description.contains("pase") {
        TouchdownKind::Pass
    } else {
        TouchdownKind::Run
    }
}

/// Player credited with the points of a scoring play.
fn scorer<'a>(play: &'a Play, fallback: Option<&'a PlayerId>) -> Option<&'a PlayerId> {
    play.touchdown_player.as_ref().or(fallback)
}

/// Credits for one play. The team in possession is the offense; defensive
/// credits go to the other team regardless of who acted.
pub fn resolve(play: &Play, local: &TeamRef, visitor: &TeamRef) -> Result<Attribution, AttributionError> {
    let offense = possession_side(play, local, visitor)?;
    let defense = offense.opposite();
    let touchdown = play.outcome.is_touchdown;

    let primary = play.primary_player.as_ref();
    let secondary = play.secondary_player.as_ref();

    let mut list = CreditList::new();

    match &play.play_type {
        PlayType::PassComplete => {
            list.add(offense, primary, Category::PassAttempt);
            list.add(offense, primary, Category::PassCompletion);
            if touchdown {
                list.add(offense, primary, Category::PassTouchdown);
            }
            if secondary.is_some() {
                list.add(offense, secondary, Category::Reception);
                if touchdown {
                    list.add(offense, secondary, Category::ReceptionTouchdown);
                }
            }
            if touchdown {
                list.add_delta(offense, scorer(play, secondary), Category::Points, TOUCHDOWN_POINTS);
            }
        }
        PlayType::PassIncomplete => {
            list.add(offense, primary, Category::PassAttempt);
        }
        PlayType::Run => {
            list.add(offense, primary, Category::RunAttempt);
            if touchdown {
                list.add(offense, primary, Category::RunTouchdown);
                list.add_delta(offense, scorer(play, primary), Category::Points, TOUCHDOWN_POINTS);
            }
        }
        PlayType::Interception => {
            list.add(defense, primary, Category::Interception);
            if touchdown {
                // Return scores count as a team pass touchdown, never a player's.
                list.add(defense, None, Category::PassTouchdown);
                list.add_delta(defense, scorer(play, primary), Category::Points, TOUCHDOWN_POINTS);
            }
        }
        PlayType::Sack => {
            list.add(defense, primary, Category::Sack);
        }
        PlayType::Tackle => {
            list.add(defense, primary, Category::Tackle);
        }
        PlayType::Touchdown => {
            match classify_generic_touchdown(&play.description) {
                TouchdownKind::Pass => {
                    // Generic touchdowns never credit a reception.
                    list.add(offense, primary, Category::PassTouchdown);
                    list.add_delta(offense, scorer(play, secondary.or(primary)), Category::Points, TOUCHDOWN_POINTS);
                }
                TouchdownKind::Run => {
                    list.add(offense, primary, Category::RunTouchdown);
                    list.add_delta(offense, scorer(play, primary), Category::Points, TOUCHDOWN_POINTS);
                }
            }
        }
        PlayType::Conversion1Pt | PlayType::Conversion2Pt => {
            let (category, points) = if play.play_type == PlayType::Conversion1Pt {
                (Category::ConversionOnePoint, 1)
            } else {
                (Category::ConversionTwoPoint, 2)
            };
            list.add(offense, primary, category);
            if secondary.is_some() {
                list.add(offense, secondary, Category::Reception);
                list.add(offense, secondary, Category::ConversionCatch);
            }
            list.add_delta(offense, scorer(play, secondary.or(primary)), Category::Points, points);
        }
        PlayType::Safety => {
            list.add(defense, None, Category::Safety);
            list.add_delta(defense, scorer(play, None), Category::Points, SAFETY_POINTS);
        }
        PlayType::Unrecognized(raw) => {
            return Err(AttributionError::UnknownPlayType(raw.clone()));
        }
    }

    Ok(Attribution {
        offense,
        credits: list.credits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn teams() -> (TeamRef, TeamRef) {
        (TeamRef::new("loc", "Lobos"), TeamRef::new("vis", "Halcones"))
    }

    fn credits_for(play: &Play) -> Vec<Credit> {
        let (local, visitor) = teams();
        resolve(play, &local, &visitor).unwrap().credits
    }

    fn has(credits: &[Credit], side: Side, player: Option<&str>, category: Category) -> bool {
        credits
            .iter()
            .any(|c| c.side == side && c.player.as_deref() == player && c.category == category)
    }

    #[test]
    fn test_pass_complete_touchdown_credits_offense_and_receiver() {
        let play = Play::new(1, PlayType::PassComplete, "loc")
            .with_primary("qb")
            .with_secondary("wr")
            .scoring_touchdown();
        let credits = credits_for(&play);

        assert!(has(&credits, Side::Local, Some("qb"), Category::PassAttempt));
        assert!(has(&credits, Side::Local, Some("qb"), Category::PassCompletion));
        assert!(has(&credits, Side::Local, Some("qb"), Category::PassTouchdown));
        assert!(has(&credits, Side::Local, Some("wr"), Category::Reception));
        assert!(has(&credits, Side::Local, Some("wr"), Category::ReceptionTouchdown));
        assert!(credits.contains(&Credit {
            side: Side::Local,
            player: Some("wr".to_string()),
            category: Category::Points,
            delta: 6,
        }));
        assert!(credits.iter().all(|c| c.side == Side::Local));
    }

    #[test]
    fn test_pass_incomplete_is_attempt_only() {
        let play = Play::new(1, PlayType::PassIncomplete, "vis").with_primary("qb");
        let credits = credits_for(&play);
        assert_eq!(
            credits,
            vec![Credit {
                side: Side::Visitor,
                player: Some("qb".to_string()),
                category: Category::PassAttempt,
                delta: 1,
            }]
        );
    }

    #[test]
    fn test_defensive_plays_go_to_the_other_team() {
        for play_type in [PlayType::Interception, PlayType::Sack, PlayType::Tackle] {
            let play = Play::new(3, play_type.clone(), "loc").with_primary("lb");
            let credits = credits_for(&play);
            assert_eq!(credits.len(), 1, "{}", play_type);
            assert_eq!(credits[0].side, Side::Visitor, "{}", play_type);
            assert_eq!(credits[0].player.as_deref(), Some("lb"));
        }
    }

    #[test]
    fn test_interception_return_is_defensive_pass_touchdown() {
        let play = Play::new(5, PlayType::Interception, "loc")
            .with_primary("cb")
            .scoring_touchdown();
        let credits = credits_for(&play);

        assert!(has(&credits, Side::Visitor, Some("cb"), Category::Interception));
        assert!(has(&credits, Side::Visitor, None, Category::PassTouchdown));
        assert!(has(&credits, Side::Visitor, Some("cb"), Category::Points));
        assert!(credits.iter().all(|c| c.side == Side::Visitor));
    }

    #[test]
    fn test_safety_scores_two_for_defense() {
        let play = Play::new(9, PlayType::Safety, "loc").with_primary("rb");
        let (local, visitor) = teams();
        let attribution = resolve(&play, &local, &visitor).unwrap();

        assert_eq!(attribution.points(), 2);
        assert!(attribution.credits.iter().all(|c| c.side == Side::Visitor));
        assert!(attribution.credits.iter().all(|c| c.player.is_none()));
    }

    #[test]
    fn test_conversions_score_and_credit_receiver() {
        let one = Play::new(2, PlayType::Conversion1Pt, "vis").with_primary("qb").with_secondary("te");
        let two = Play::new(3, PlayType::Conversion2Pt, "vis").with_primary("qb").with_secondary("te");
        let (local, visitor) = teams();

        let one = resolve(&one, &local, &visitor).unwrap();
        let two = resolve(&two, &local, &visitor).unwrap();
        assert_eq!(one.points(), 1);
        assert_eq!(two.points(), 2);
        assert!(has(&one.credits, Side::Visitor, Some("qb"), Category::ConversionOnePoint));
        assert!(has(&two.credits, Side::Visitor, Some("qb"), Category::ConversionTwoPoint));
        assert!(has(&two.credits, Side::Visitor, Some("te"), Category::ConversionCatch));
        assert!(has(&two.credits, Side::Visitor, Some("te"), Category::Reception));
        assert!(!has(&two.credits, Side::Visitor, Some("te"), Category::ReceptionTouchdown));
    }

    #[test]
    fn test_touchdown_player_overrides_scorer() {
        let play = Play::new(4, PlayType::Run, "loc")
            .with_primary("rb")
            .with_touchdown_player("fb")
            .scoring_touchdown();
        let credits = credits_for(&play);
        assert!(has(&credits, Side::Local, Some("fb"), Category::Points));
        assert!(!has(&credits, Side::Local, Some("rb"), Category::Points));
    }

    #[test]
    fn test_generic_touchdown_classification() {
        assert_eq!(classify_generic_touchdown("TD de pase de 20 yardas"), TouchdownKind::Pass);
        assert_eq!(classify_generic_touchdown("carrera por la banda"), TouchdownKind::Run);
        // Known misread: "pase" inside another word still counts as a pass.
        assert_eq!(classify_generic_touchdown("se pasea hasta la zona"), TouchdownKind::Pass);
        assert_eq!(classify_generic_touchdown("Pase largo"), TouchdownKind::Run);

        let pass = Play::new(6, PlayType::Touchdown, "loc").with_primary("qb").with_description("pase corto");
        let run = Play::new(7, PlayType::Touchdown, "loc").with_primary("rb").with_description("carrera");
        assert!(has(&credits_for(&pass), Side::Local, Some("qb"), Category::PassTouchdown));
        assert!(has(&credits_for(&run), Side::Local, Some("rb"), Category::RunTouchdown));
    }

    #[test]
    fn test_generic_pass_touchdown_gives_no_reception() {
        let play = Play::new(8, PlayType::Touchdown, "loc")
            .with_primary("qb")
            .with_secondary("wr")
            .with_description("pase largo")
            .scoring_touchdown();
        let credits = credits_for(&play);

        assert!(has(&credits, Side::Local, Some("qb"), Category::PassTouchdown));
        assert!(!has(&credits, Side::Local, Some("wr"), Category::Reception));
        assert!(!has(&credits, Side::Local, Some("wr"), Category::ReceptionTouchdown));
        // Points still fall back to the secondary player.
        assert!(has(&credits, Side::Local, Some("wr"), Category::Points));
    }

    #[test]
    fn test_rejects_bad_possession() {
        let (local, visitor) = teams();
        let mut play = Play::new(1, PlayType::Run, "loc");
        play.possessing_team = None;
        assert_eq!(resolve(&play, &local, &visitor), Err(AttributionError::MissingPossession));

        let play = Play::new(1, PlayType::Run, "other");
        assert_eq!(
            resolve(&play, &local, &visitor),
            Err(AttributionError::UnknownTeam("other".to_string()))
        );
    }

    #[test]
    fn test_unknown_play_type_is_rejected() {
        let (local, visitor) = teams();
        let play = Play::new(1, PlayType::Unrecognized("fumble".to_string()), "loc");
        assert_eq!(
            resolve(&play, &local, &visitor),
            Err(AttributionError::UnknownPlayType("fumble".to_string()))
        );
    }

    #[test]
    fn test_missing_players_still_credit_team() {
        let play = Play::new(1, PlayType::Tackle, "vis");
        let credits = credits_for(&play);
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].side, Side::Local);
        assert!(credits[0].player.is_none());
    }
}

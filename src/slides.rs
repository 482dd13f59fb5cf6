//! Static slide content.
//!
//! The deck is known at compile time and never changes at runtime; everything
//! downstream (view, surface, export) borrows from [`SLIDES`] and [`DECK`].

use serde::Serialize;

/// One slide record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub points: &'static [&'static str],
    pub payoff: &'static str,
}

/// Header copy shown above the slides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeckIntro {
    pub kicker: &'static str,
    pub headline: &'static str,
    pub lede: &'static str,
}

pub static DECK: DeckIntro = DeckIntro {
    kicker: "English Literature in Practice",
    headline: "Five slide story on how literature skills unlock everyday advantages.",
    lede: "Explore the concrete ways literary training strengthens communication, \
           leadership, and resilience across modern workplaces.",
};

pub static SLIDES: &[Slide] = &[
    Slide {
        title: "Build Persuasive Communication",
        subtitle: Some("Narrative thinking sharpens how you speak, write, and pitch."),
        points: &[
            "Literary analysis trains you to shape ideas into compelling story arcs.",
            "Rich vocabulary makes reports, emails, and pitches feel confident.",
            "Voice control from close reading improves the tone of client updates.",
        ],
        payoff: "Teams backed by strong communicators close deals faster and reduce feedback loops.",
    },
    Slide {
        title: "Grow Empathy for Stakeholders",
        subtitle: Some("Characters and conflicts mirror the people you collaborate with."),
        points: &[
            "Understanding multiple points-of-view lowers friction in cross-functional work.",
            "Recognising subtle motivations helps with coaching and performance reviews.",
            "Literature\u{2019}s emotional range prepares you for tough conversations with grace.",
        ],
        payoff: "Empathic leadership keeps retention high and powers customer-obsessed cultures.",
    },
    Slide {
        title: "Strengthen Critical Analysis",
        subtitle: Some("Close reading mirrors how you dissect briefs, data, and decisions."),
        points: &[
            "Identifying themes teaches you to surface patterns in metrics and research.",
            "Evaluating unreliable narrators builds healthy scepticism in due diligence.",
            "Comparative reading translates into sharper competitive and market analyses.",
        ],
        payoff: "Sharper analysis turns raw information into confident recommendations stakeholders trust.",
    },
    Slide {
        title: "Fuel Creativity & Innovation",
        subtitle: Some("Exposure to diverse styles unlocks original solutions at work."),
        points: &[
            "Metaphors reframe problems so teams escape default solutions.",
            "Genre-bending texts normalise experimentation in product roadmaps.",
            "Symbolism encourages playful visuals and copy for campaigns or decks.",
        ],
        payoff: "Inventive teams ship experiences that stand out and feel human-centred.",
    },
    Slide {
        title: "Sustain Resilience & Wellbeing",
        subtitle: Some("Stories model how people navigate uncertainty and change."),
        points: &[
            "Plot twists train you to scenario-plan and stay calm when plans shift.",
            "Motifs of perseverance remind teams why their mission matters.",
            "Reflective journaling borrowed from lit studies grounds personal growth.",
        ],
        payoff: "Grounded professionals bounce back faster and support peers through pressure cycles.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_has_five_complete_slides() {
        assert_eq!(SLIDES.len(), 5);
        for slide in SLIDES {
            assert!(!slide.title.is_empty());
            assert!(!slide.points.is_empty());
            assert!(!slide.payoff.is_empty());
        }
    }

    #[test]
    fn slide_titles_are_unique() {
        let mut titles: Vec<_> = SLIDES.iter().map(|s| s.title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), SLIDES.len());
    }
}

//! Guided coping strategies, four per mood input.

use crate::model::{MoodState, Slider};

/// How far completing a strategy moves its input.
pub(crate) const COMPLETION_BOOST: i32 = 10;

pub(crate) struct Strategy {
    pub(crate) category: Slider,
    pub(crate) title: &'static str,
    pub(crate) description: &'static str,
    pub(crate) steps: [&'static str; 6],
}

impl Strategy {
    /// Motivation and focus go up; stress goes down.
    pub(crate) fn complete(&self, mood: &mut MoodState) {
        let delta = match self.category {
            Slider::Stress => -COMPLETION_BOOST,
            Slider::Motivation | Slider::Focus => COMPLETION_BOOST,
        };
        mood.adjust(self.category, delta);
    }
}

pub(crate) const CATALOG: [Strategy; 12] = [
    Strategy {
        category: Slider::Motivation,
        title: "Take a Walk",
        description: "Physical movement is one of the quickest ways to boost your motivation and energy levels.",
        steps: [
            "Stand up and stretch for 30 seconds",
            "Put on comfortable shoes",
            "Step outside or find a walking path",
            "Walk briskly for 10-15 minutes",
            "Focus on your breathing and surroundings",
            "Notice how your body feels energized",
        ],
    },
    Strategy {
        category: Slider::Motivation,
        title: "Play Energizing Music",
        description: "Music can instantly shift your mood and boost motivation.",
        steps: [
            "Choose upbeat, positive music you enjoy",
            "Set volume to a comfortable level",
            "Close your eyes and listen for 1-2 songs",
            "Move your body to the rhythm if you feel like it",
            "Sing along if you know the words",
            "Feel the energy flowing through you",
        ],
    },
    Strategy {
        category: Slider::Motivation,
        title: "Set a Small Goal",
        description: "Achieving small wins builds momentum for bigger accomplishments.",
        steps: [
            "Choose one simple task (5-10 minutes)",
            "Write it down clearly",
            "Break it into 3 tiny steps",
            "Complete step 1 right now",
            "Celebrate this small win",
            "Use the momentum to continue",
        ],
    },
    Strategy {
        category: Slider::Motivation,
        title: "Connect with Someone",
        description: "Social connection can provide instant motivation and support.",
        steps: [
            "Think of someone who energizes you",
            "Send them a quick message or call",
            "Share one positive thing from today",
            "Ask them about their day",
            "Plan something fun together",
            "Thank them for their time",
        ],
    },
    Strategy {
        category: Slider::Focus,
        title: "Start a Focus Session",
        description: "The Pomodoro Technique helps maintain concentration through structured work periods.",
        steps: [
            "Choose one specific task to focus on",
            "Set a timer for 25 minutes",
            "Work on only this task",
            "When timer rings, take a 5-minute break",
            "Stretch, breathe, or get water",
            "Repeat for another session if needed",
        ],
    },
    Strategy {
        category: Slider::Focus,
        title: "Clear Your Space",
        description: "A tidy environment promotes a clear, focused mind.",
        steps: [
            "Look at your immediate workspace",
            "Remove any trash or dishes",
            "Organize papers and supplies",
            "Wipe down surfaces",
            "Put away 3 distracting items",
            "Take a deep breath in your clean space",
        ],
    },
    Strategy {
        category: Slider::Focus,
        title: "Take a Mindful Break",
        description: "Strategic breaks actually improve focus when you return to work.",
        steps: [
            "Step away from your current task",
            "Make a warm beverage or get water",
            "Look out a window for 60 seconds",
            "Do 5 shoulder rolls backward",
            "Take 5 deep, slow breaths",
            "Return to work with fresh perspective",
        ],
    },
    Strategy {
        category: Slider::Focus,
        title: "Create a Priority List",
        description: "Writing down tasks clears mental clutter and improves focus.",
        steps: [
            "Get a piece of paper or open notes app",
            "Brain dump all tasks on your mind",
            "Circle the 3 most important ones",
            "Number them in priority order",
            "Put the list where you can see it",
            "Focus only on item #1 for now",
        ],
    },
    Strategy {
        category: Slider::Stress,
        title: "Practice Deep Breathing",
        description: "Controlled breathing activates your body's relaxation response.",
        steps: [
            "Sit comfortably with feet flat on floor",
            "Place one hand on chest, one on belly",
            "Inhale slowly through nose for 4 counts",
            "Hold breath gently for 4 counts",
            "Exhale through mouth for 6 counts",
            "Repeat this cycle 5-10 times",
        ],
    },
    Strategy {
        category: Slider::Stress,
        title: "Quick Meditation",
        description: "Even brief meditation can significantly reduce stress levels.",
        steps: [
            "Find a quiet spot and sit comfortably",
            "Close your eyes or soften your gaze",
            "Notice your natural breathing",
            "When thoughts arise, acknowledge them",
            "Gently return focus to your breath",
            "Continue for 5-10 minutes",
        ],
    },
    Strategy {
        category: Slider::Stress,
        title: "Express Your Feelings",
        description: "Writing helps process emotions and reduce stress.",
        steps: [
            "Get paper or open a notes app",
            "Write 'I feel...' and complete the sentence",
            "Don't judge, just let words flow",
            "Describe what triggered these feelings",
            "Write one thing you're grateful for",
            "Close with one kind message to yourself",
        ],
    },
    Strategy {
        category: Slider::Stress,
        title: "Connect with Nature",
        description: "Nature exposure quickly reduces cortisol and stress levels.",
        steps: [
            "Step outside or find a window",
            "Look at something green or natural",
            "Take 10 slow, deep breaths of fresh air",
            "Notice 3 things you can see in nature",
            "Listen for natural sounds",
            "Feel the air or sun on your skin",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_strategies_per_input() {
        for slider in Slider::ALL {
            let n = CATALOG.iter().filter(|s| s.category == slider).count();
            assert_eq!(n, 4, "{}", slider.label());
        }
    }

    #[test]
    fn completion_moves_the_right_input() {
        let mut mood = MoodState::new(50, 50, 50);
        CATALOG[0].complete(&mut mood);
        assert_eq!(mood, MoodState::new(60, 50, 50));
        CATALOG[4].complete(&mut mood);
        assert_eq!(mood, MoodState::new(60, 60, 50));
        CATALOG[8].complete(&mut mood);
        assert_eq!(mood, MoodState::new(60, 60, 40));
    }

    #[test]
    fn completion_saturates() {
        let mut mood = MoodState::new(95, 100, 4);
        CATALOG[1].complete(&mut mood);
        CATALOG[5].complete(&mut mood);
        CATALOG[9].complete(&mut mood);
        assert_eq!(mood, MoodState::new(100, 100, 0));
    }
}

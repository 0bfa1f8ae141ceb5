//! Page copy. Multi-line entries are joined per layout by `layout::break_lines`.

pub struct FormCopy {
    pub placeholder: &'static str,
    pub button: &'static str,
    pub note: &'static str,
    pub success: &'static str,
}

pub const SENDING_LABEL: &str = "Sending...";

pub const HERO_TITLE: &str = "Stop missing out";
pub const HERO_HIGHLIGHT: &str = "start showing up";
pub const HERO_SUBTITLE: [&str; 2] = [
    "The best plans. The right people. The perfect timing.",
    "All in one place.",
];

pub const PRIMARY_FORM: FormCopy = FormCopy {
    placeholder: "Enter your email",
    button: "Get Early Access \u{2192}",
    note: "No spam. Just access.",
    success: "You're on the list.",
};

pub const SECONDARY_FORM: FormCopy = FormCopy {
    placeholder: "Your email",
    button: "I'm In",
    note: "Unsubscribe anytime. We respect your inbox.",
    success: "Welcome to early access.",
};

pub const FILTER_TITLE: &str = "This isn't for everyone";
pub const FILTER_QUOTE: &str =
    "If going out, meeting new people, and trying new places isn't your thing.";
pub const FILTER_HIGHLIGHT: &str = "Then this probably isn't it.";

pub const VIBE_CAPTIONS: [&str; 2] = [
    "You hear about this the next day.",
    "Or you're already there.",
];

pub const EARLY_TITLE: &str = "Early means";
pub const EARLY_HIGHLIGHT: &str = "everything";
pub const EARLY_BODY: [&str; 2] = [
    "First access. First picks. First to know.",
    "The window closes soon.",
];

pub const URGENCY_BADGE: &str = "ROLLING INVITES";
pub const URGENCY_TITLE: [&str; 2] = ["We're not waiting", "for everyone"];
pub const URGENCY_BODY: [&str; 2] = [
    "Early access goes to people who move now.",
    "Not people who think about it.",
];
pub const URGENCY_FOOTNOTE: [&str; 2] = [
    "Once we hit capacity, the list closes.",
    "Then it's just watching others talk about it.",
];

pub const SECOND_CAPTURE_TITLE: &str = "Don't be the person who waits";

pub const FINAL_TITLE: [&str; 2] = ["The best nights", "start before"];
pub const FINAL_HIGHLIGHT: &str = "everyone else knows";
pub const FINAL_SUBTITLE: [&str; 2] = ["You'll either be early.", "Or you'll hear about it later."];

pub const FOOTER: &str = "Dayzi \u{00a9} 2026";

//! Canned chatbot responses
//!
//! An ordered keyword-rule table gated by role. The message is
//! lower-cased, rules are checked in order, and the first match wins;
//! nothing matching yields a role-appropriate default.

use crate::models::Role;

/// A chatbot answer: response text plus short follow-up suggestions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReply {
    pub text: String,
    pub suggestions: Vec<String>,
}

struct Rule {
    /// Any of these substrings triggers the rule
    keywords: &'static [&'static str],
    /// Empty means the rule applies to every role
    roles: &'static [Role],
    reply: &'static str,
    suggestions: &'static [&'static str],
}

const RULES: &[Rule] = &[
    Rule {
        keywords: &["create event", "create an event", "new event", "add event"],
        roles: &[Role::SuperAdmin, Role::Organizer],
        reply: "To create an event, open Events and choose New Event.\n\
                Fill in the schedule and location, pick a capacity policy,\n\
                and add ticket types if you charge admission. Events stay\n\
                in draft until you publish them.",
        suggestions: &["How do ticket types work?", "How do I publish an event?"],
    },
    Rule {
        keywords: &["publish"],
        roles: &[Role::SuperAdmin, Role::Organizer],
        reply: "Open the event's detail page and press Publish. Draft\n\
                events are invisible to participants until published.",
        suggestions: &["How do I create an event?", "Can I postpone an event?"],
    },
    Rule {
        keywords: &["waitlist", "wait list"],
        roles: &[],
        reply: "When an event or ticket type is full and its waitlist is\n\
                enabled, new registrations are admitted as waitlisted.\n\
                Organizers approve or reject waitlist entries from the\n\
                waitlist dialog; approved entries become confirmed.",
        suggestions: &["How do refunds work?", "How do I register?"],
    },
    Rule {
        keywords: &["refund", "money back"],
        roles: &[],
        reply: "Refund requests are reviewed by the organizer. Once\n\
                approved, the refund is processed through the payment\n\
                provider and you will see a reference id on the request.\n\
                Requests expire if not processed in time.",
        suggestions: &["How long does a refund take?", "How do I cancel my registration?"],
    },
    Rule {
        keywords: &["cancel my registration", "cancel registration", "unregister"],
        roles: &[],
        reply: "You can cancel a pending, confirmed or waitlisted\n\
                registration from My Registrations, up to 12 hours before\n\
                the event starts. Later than that, contact the organizer.",
        suggestions: &["How do refunds work?"],
    },
    Rule {
        keywords: &["register", "sign up", "signup", "ticket"],
        roles: &[],
        reply: "Open the event page and press Register. Choose a session\n\
                and a ticket type where offered; sold-out types are\n\
                disabled. Paid registrations ask for your card before the\n\
                registration is created. You can also register as a guest\n\
                with your name, email, phone and country.",
        suggestions: &["What is a waitlist?", "How do I cancel my registration?"],
    },
    Rule {
        keywords: &["stream", "broadcast", "recording"],
        roles: &[Role::SuperAdmin, Role::Organizer],
        reply: "Configure the stream from the event's streaming panel,\n\
                then use Start, Pause and Stop. Recording can be toggled\n\
                while live, and participants join through the join link.",
        suggestions: &["How do I publish an event?"],
    },
    Rule {
        keywords: &["reminder", "notify attendees", "announcement"],
        roles: &[Role::SuperAdmin, Role::Organizer],
        reply: "Custom reminders go out by email or SMS to an audience\n\
                you pick: everyone, confirmed, waitlisted, attended, or a\n\
                custom recipient list. Send them immediately or schedule\n\
                them for a future time.",
        suggestions: &["How do I export registrations?"],
    },
    Rule {
        keywords: &["export", "download", "csv", "excel", "pdf"],
        roles: &[Role::SuperAdmin, Role::Organizer],
        reply: "Registration lists can be exported as CSV, Excel or PDF\n\
                from the registrations table on the event detail page.",
        suggestions: &["How do reminders work?"],
    },
    Rule {
        keywords: &["payment", "card", "charge", "price"],
        roles: &[],
        reply: "Paid events validate your card against the exact ticket\n\
                price before creating the registration, and the charge is\n\
                confirmed server-side right after. If confirmation fails\n\
                the registration's payment is cancelled automatically.",
        suggestions: &["How do refunds work?", "How do I register?"],
    },
];

fn default_reply(role: Role) -> BotReply {
    match role {
        Role::SuperAdmin | Role::Organizer => BotReply {
            text: "I can help with events, registrations, waitlists,\n\
                   refunds, reminders, streaming and exports. What would\n\
                   you like to do?"
                .to_string(),
            suggestions: vec![
                "How do I create an event?".to_string(),
                "How do I manage the waitlist?".to_string(),
                "How do I export registrations?".to_string(),
            ],
        },
        Role::Participant => BotReply {
            text: "I can help with registering for events, waitlists,\n\
                   cancellations and refunds. What would you like to know?"
                .to_string(),
            suggestions: vec![
                "How do I register?".to_string(),
                "How do refunds work?".to_string(),
                "How do I cancel my registration?".to_string(),
            ],
        },
    }
}

/// Answer a message from the canned rule table
pub fn respond(message: &str, role: Role) -> BotReply {
    let normalized = message.to_lowercase();

    for rule in RULES {
        let role_allowed = rule.roles.is_empty() || rule.roles.contains(&role);
        if !role_allowed {
            continue;
        }
        if rule.keywords.iter().any(|k| normalized.contains(k)) {
            return BotReply {
                text: rule.reply.to_string(),
                suggestions: rule.suggestions.iter().map(|s| s.to_string()).collect(),
            };
        }
    }

    default_reply(role)
}

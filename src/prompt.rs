pub const PERSONA: &str = "You are a kind and supportive educational assistant for students.";

pub const INSTRUCTIONS: [&str; 4] = [
    "Guide and motivate the student to accept their mistakes.",
    "Point out specific areas where they can improve, providing relevant examples.",
    "Explain any language rules or concepts related to their mistakes.",
    "Provide a revised version of their essay, slightly modifying their writing style but keeping it appropriate for their class level.",
];

const REQUEST_HEADER: &str = "Please provide constructive feedback on the essay considering the class level and topic. Your feedback should:";

const CLOSING: &str = "Be encouraging and focus on helping the student learn and grow.";

/// Fills the feedback template. Values are inserted literally, so placeholder-looking
/// text inside an essay is never expanded.
pub fn build_feedback_prompt(class_level: &str, topic: &str, essay: &str) -> String {
    let mut prompt = String::with_capacity(
        PERSONA.len() + REQUEST_HEADER.len() + CLOSING.len() + essay.len() + topic.len() + 512,
    );

    prompt.push_str(PERSONA);
    prompt.push_str("\n\nClass Level: ");
    prompt.push_str(class_level);
    prompt.push_str("\nTopic: ");
    prompt.push_str(topic);
    prompt.push_str("\nEssay:\n");
    prompt.push_str(essay);
    prompt.push_str("\n\n");
    prompt.push_str(REQUEST_HEADER);
    prompt.push_str("\n\n");
    for instruction in INSTRUCTIONS {
        prompt.push_str("- ");
        prompt.push_str(instruction);
        prompt.push('\n');
    }
    prompt.push('\n');
    prompt.push_str(CLOSING);
    prompt.push('\n');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prompt_embeds_values_and_instructions_once(
            class_level in "Class [1-5]",
            topic in "[A-Za-z0-9 {}.,!?'-]{1,40}",
            essay in "[A-Za-z0-9 {}.,!?'\n-]{1,200}",
        ) {
            let prompt = build_feedback_prompt(&class_level, &topic, &essay);
            prop_assert!(prompt.contains(&class_level));
            prop_assert!(prompt.contains(&topic));
            prop_assert!(prompt.contains(&essay));
            for instruction in INSTRUCTIONS {
                prop_assert_eq!(prompt.matches(instruction).count(), 1);
            }
        }
    }

    #[test]
    fn prompt_layout_matches_template() {
        let prompt = build_feedback_prompt("Class 3", "My Pet", "I has a dog. He is run fast.");
        assert_eq!(
            prompt,
            "You are a kind and supportive educational assistant for students.\n\
             \n\
             Class Level: Class 3\n\
             Topic: My Pet\n\
             Essay:\n\
             I has a dog. He is run fast.\n\
             \n\
             Please provide constructive feedback on the essay considering the class level and topic. Your feedback should:\n\
             \n\
             - Guide and motivate the student to accept their mistakes.\n\
             - Point out specific areas where they can improve, providing relevant examples.\n\
             - Explain any language rules or concepts related to their mistakes.\n\
             - Provide a revised version of their essay, slightly modifying their writing style but keeping it appropriate for their class level.\n\
             \n\
             Be encouraging and focus on helping the student learn and grow.\n"
        );
    }

    #[test]
    fn placeholder_syntax_is_left_alone() {
        let prompt = build_feedback_prompt("Class 1", "{essay}", "{class_level} and {{topic}}");
        assert!(prompt.contains("Topic: {essay}\n"));
        assert!(prompt.contains("Essay:\n{class_level} and {{topic}}\n"));
        assert_eq!(prompt.matches("Class Level: Class 1").count(), 1);
    }
}

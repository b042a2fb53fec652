//! Prompt text and output schemas for each tutor mode.

use crate::generator::{ModelTier, OutputSchema, Prompt};
use crate::subject::{Difficulty, Subject};
use serde_json::json;

/// Number of topics requested for a subject index.
pub const TOPIC_COUNT: usize = 8;

/// Number of questions requested per quiz.
pub const QUIZ_LENGTH: usize = 5;

pub const TOPICS_TOOL: &str = "topic_index";
pub const QUIZ_TOOL: &str = "quiz";

/// Step-by-step solution for a free-text problem.
pub fn solve_prompt(subject: Subject, problem: &str, thinking_budget: Option<usize>) -> Prompt {
    let system = format!(
        "You are an expert, patient {subject} teacher.\n\
         Solve the problem you are given step by step:\n\
         1. Identify what kind of problem it is.\n\
         2. List the known data.\n\
         3. Explain the formulas or theorems you need.\n\
         4. Solve the problem, showing the working clearly.\n\
         5. Finish with the final answer in **bold**.\n\
         Format the answer in Markdown. Use LaTeX between $ signs for complex formulas."
    );

    Prompt::new(problem)
        .with_system(system)
        .with_tier(ModelTier::Reasoning)
        .with_thinking(thinking_budget)
}

/// A full lesson on one topic, in the restricted Markdown the renderer reads.
pub fn theory_prompt(subject: Subject, topic: &str) -> Prompt {
    let user = format!(
        "Explain the topic \"{topic}\" in the context of {subject} in detail.\n\
         The explanation must be richly structured Markdown using only headings, \
         `- ` lists, `> ` quotes, paragraphs and **bold**.\n\
         \n\
         Required structure:\n\
         # Concept Title\n\
         \n\
         ## Definition\n\
         [A clear, concise definition]\n\
         \n\
         ## Key Principles\n\
         - [Point 1]\n\
         - [Point 2]\n\
         \n\
         ## Detailed Explanation\n\
         [Develop the topic in clear paragraphs]\n\
         \n\
         ## Analogy / Real Example\n\
         > [A simple comparison or practical use]\n\
         \n\
         ## Conclusion\n\
         [One short paragraph]\n\
         \n\
         Use **bold** for important terms."
    );

    Prompt::new(user).with_tier(ModelTier::Fast)
}

/// An ordered topic index for a subject.
pub fn topics_prompt(subject: Subject) -> Prompt {
    Prompt::new(format!(
        "List {TOPIC_COUNT} fundamental, interesting topics to study in {subject}, \
         ordered from simplest to most complex. Use short titles."
    ))
    .with_tier(ModelTier::Fast)
}

/// Multiple-choice questions at a difficulty level.
pub fn quiz_prompt(subject: Subject, difficulty: Difficulty) -> Prompt {
    Prompt::new(format!(
        "Write {QUIZ_LENGTH} multiple-choice questions about {subject} at {difficulty} level. \
         Each question has exactly 4 options, the 0-based index of the correct option, \
         and a brief explanation of why it is correct."
    ))
    .with_tier(ModelTier::Fast)
}

pub fn topics_schema() -> OutputSchema {
    OutputSchema {
        name: TOPICS_TOOL.to_string(),
        description: "Record the ordered list of topic titles".to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "topics": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["topics"]
        }),
    }
}

pub fn quiz_schema() -> OutputSchema {
    OutputSchema {
        name: QUIZ_TOOL.to_string(),
        description: "Record the quiz questions".to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "questions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": { "type": "string" },
                            "options": {
                                "type": "array",
                                "items": { "type": "string" },
                                "minItems": 4,
                                "maxItems": 4
                            },
                            "correctIndex": {
                                "type": "integer",
                                "description": "Index 0-3 of the correct answer"
                            },
                            "explanation": {
                                "type": "string",
                                "description": "Brief explanation of why it is correct"
                            }
                        },
                        "required": ["question", "options", "correctIndex", "explanation"]
                    }
                }
            },
            "required": ["questions"]
        }),
    }
}

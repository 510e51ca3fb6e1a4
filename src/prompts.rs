// Prompt templates for the model backend

/// System prompt framing the assistant's role
pub const SYSTEM_PROMPT: &str =
    "You are an Agile AI assistant that generates user stories and test cases.";

/// User prompt template; `{epic}` is replaced with the epic text
pub const USER_PROMPT_TEMPLATE: &str = "Given the following epic: {epic}\n\
Generate user stories and test cases in Agile format.\n\
Each story must include Title, Description, Acceptance Criteria (Given/When/Then), \
and Story Points (1-13). Each test case must include ID, Objective, Expected Result.\n\
Return valid JSON with keys 'UserStories' and 'TestCases'.";

/// Build the user prompt for one epic
pub fn build_user_prompt(epic_text: &str) -> String {
    USER_PROMPT_TEMPLATE.replace("{epic}", epic_text)
}

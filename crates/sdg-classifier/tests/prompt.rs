use sdg_classifier::prompt::{build_catalog_block, build_system_prompt, build_user_message};
use sdg_core::models::goal::catalog;

#[test]
fn catalog_block_lists_every_goal() {
    let block = build_catalog_block(&catalog());
    assert!(block.starts_with("<goal_catalog>"));
    assert!(block.ends_with("</goal_catalog>"));
    assert_eq!(block.matches("<goal number=").count(), 17);
    assert!(block.contains("<goal number=\"17\" name=\"Partnerships for the Goals\">"));
}

#[test]
fn system_prompt_states_limit_and_shape() {
    let prompt = build_system_prompt(&catalog(), 3);
    assert!(prompt.contains("at most 3 goals"));
    assert!(prompt.contains("\"sdg_number\""));
    assert!(prompt.contains("\"relevance_score\""));
    assert!(prompt.contains("Clean Water and Sanitation"));
}

#[test]
fn user_message_wraps_trimmed_activity_text() {
    let message = build_user_message("  Mobile clinics ", "Maternal health in Narok.\n");
    assert!(message.contains("<title>Mobile clinics</title>"));
    assert!(message.contains("Maternal health in Narok.\n</description>"));
}

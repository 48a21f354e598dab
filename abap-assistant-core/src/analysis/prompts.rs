// prompt construction module - renders learned conventions as plain text for ai requests

use super::profile::{ProjectPatternProfile, StyleCategory};

/// describe the project's conventions so a model can follow them
pub fn build_project_patterns_context(profile: &ProjectPatternProfile) -> String {
    let mut context = String::new();

    if !profile.common_prefixes.is_empty() {
        context.push_str("common variable prefixes in this project:\n");
        for prefix in &profile.common_prefixes {
            context.push_str(&format!("  - {prefix}_\n"));
        }
        context.push('\n');
    }

    if !profile.naming_frequency.is_empty() {
        context.push_str("naming conventions:\n");
        for (bucket, count) in profile.top_naming_buckets(5) {
            context.push_str(&format!("  - {bucket}: {count} occurrences\n"));
        }
        context.push('\n');
    }

    if !profile.style_frequency.is_empty() {
        context.push_str("coding patterns:\n");
        push_call_style(&mut context, profile);
        push_loop_style(&mut context, profile);

        let initial_checks = profile.style_count(StyleCategory::CheckInitial)
            + profile.style_count(StyleCategory::CheckNotInitial);
        if initial_checks > 0 {
            context.push_str(&format!(
                "  - empty checks: IS INITIAL pattern used {initial_checks} times\n"
            ));
        }
    }

    context
}

fn push_call_style(context: &mut String, profile: &ProjectPatternProfile) {
    let object_oriented = profile.style_count(StyleCategory::ObjectOrientedCall);
    let procedural = profile.style_count(StyleCategory::ProceduralCall);
    if object_oriented == 0 && procedural == 0 {
        return;
    }

    context.push_str("  - method call style: ");
    if object_oriented > procedural {
        context.push_str("object-oriented (->) preferred\n");
    } else {
        context.push_str("procedural (CALL METHOD) used\n");
    }
}

fn push_loop_style(context: &mut String, profile: &ProjectPatternProfile) {
    let into = profile.style_count(StyleCategory::LoopInto);
    let assigning = profile.style_count(StyleCategory::LoopAssigning);
    let reference = profile.style_count(StyleCategory::LoopReference);
    if into == 0 && assigning == 0 && reference == 0 {
        return;
    }

    context.push_str("  - loop style: ");
    if assigning >= into && assigning >= reference {
        context.push_str("field symbols (ASSIGNING) preferred\n");
    } else if reference >= into {
        context.push_str("references (REFERENCE INTO) preferred\n");
    } else {
        context.push_str("work areas (INTO) used\n");
    }
}

/// prompt narrowing a review to one concern
pub fn build_focused_prompt(code_section: &str, focus: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!("focus specifically on: {focus}\n\n"));
    prompt.push_str("code section:\n");
    push_abap_block(&mut prompt, code_section);
    prompt
}

/// prompt asking why a flagged line is a problem and how to fix it
pub fn build_explanation_prompt(code: &str, line_number: usize, issue: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("explain why this is an issue and provide a solution:\n\n");
    prompt.push_str(&format!("issue at line {line_number}: {issue}\n\n"));
    prompt.push_str("code:\n");
    push_abap_block(&mut prompt, code);
    prompt
}

fn push_abap_block(prompt: &mut String, code: &str) {
    prompt.push_str("```abap\n");
    prompt.push_str(code);
    prompt.push_str("\n```\n");
}

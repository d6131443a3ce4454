use crate::core::model::Prompt;
use crate::core::router::LinkHints;
use crate::core::storage::AppCtx;
use crate::core::template::{self, FieldOrigin};
use crate::ui;
use console::style;

/// Display a prompt with every section and its customizable fields.
pub async fn run(ctx: &AppCtx, id: &str) -> Result<(), String> {
    let prompt = ctx
        .store
        .get_prompt(id)
        .await
        .map_err(|e| format!("No prompt with ID {}: {}", id, e))?;
    show(ctx, &prompt).await
}

pub(crate) async fn show(ctx: &AppCtx, prompt: &Prompt) -> Result<(), String> {
    let categories = ctx
        .store
        .get_categories()
        .await
        .map_err(|e| format!("Category load error: {}", e))?;

    println!("{}", style(prompt.label()).green().bold());
    println!("{} {}", style("ID:").dim(), style(&prompt.id).yellow());
    println!(
        "{} {}",
        style("Category:").dim(),
        ui::category_name(&categories, prompt.category_id.as_deref())
    );
    if !prompt.purpose.is_empty() {
        println!("{} {}", style("Purpose:").dim(), prompt.purpose);
    }
    println!(
        "{} {}",
        style("Updated:").dim(),
        prompt.updated_at.format("%Y-%m-%d %H:%M")
    );

    section("AI Persona", &prompt.ai_persona);
    section("Prompt", &prompt.prompt);
    section("Output Format", &prompt.output_format);
    section("Example", &prompt.example);
    section("Reference", &prompt.reference);

    let fields = template::resolve_fields(prompt);
    if !fields.is_empty() {
        println!("\n{}", style("Fields").cyan().bold());
        for field in &fields {
            let origin = match field.origin {
                FieldOrigin::Template => "template",
                FieldOrigin::Declared => "declared",
                FieldOrigin::Both => "template, declared",
            };
            print!(
                "  {} {} {}",
                style("•").cyan(),
                field.display_name(),
                style(format!("({})", origin)).dim()
            );
            match &field.description {
                Some(d) => println!(" - {}", d),
                None => println!(),
            }
        }
    }

    let link = ctx.router.shareable_url(
        &prompt.id,
        &LinkHints {
            title: Some(&prompt.title),
            purpose: Some(&prompt.purpose),
            ..LinkHints::default()
        },
    );
    println!("\n{} {}", style("Link:").dim(), link);
    Ok(())
}

fn section(name: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    println!("\n{}", style(name).cyan().bold());
    println!("{}", body);
}

use std::{env, fs, path::PathBuf};

use db::models::{
    content::{ContentDocument, JsonList},
    custom_page::CustomPage,
    faq::Faq,
    pricing_plan::{BillingPeriod, PricingPlan},
    project::Project,
    resume_entry::{ResumeEntry, ResumeEntryType},
    service::Service,
    site_setting::SiteSetting,
    translated::{
        MergedPage, MergedView, SortColumn, SortDirection, TranslatedEntity, ViewContent, ViewMode,
    },
};
use services::services::locale_registry::LocaleSettings;
use ts_rs::TS;
use utils::{
    locale::{FallbackChain, LocaleCode},
    response::ApiResponse,
};

/// `{name}View` and `{name}Page` response bodies of one content type.
fn response_decls<E: TranslatedEntity + TS>(name: &str) -> [String; 2] {
    [
        format!("type {name}View = {};", MergedView::<E>::inline()),
        format!("type {name}Page = {};", MergedPage::<E>::inline()),
    ]
}

fn generate_types_content() -> String {
    let header = "// This file was generated by `generate_types`. Do not edit it by hand.\n\n";

    let decls = [
        LocaleCode::decl(),
        FallbackChain::decl(),
        LocaleSettings::decl(),
        ApiResponse::<()>::decl(),
        ViewMode::decl(),
        ViewContent::decl(),
        SortColumn::decl(),
        SortDirection::decl(),
        ContentDocument::decl(),
        JsonList::decl(),
        SiteSetting::decl(),
        Project::decl(),
        Service::decl(),
        BillingPeriod::decl(),
        PricingPlan::decl(),
        Faq::decl(),
        ResumeEntryType::decl(),
        ResumeEntry::decl(),
        CustomPage::decl(),
    ];

    let responses = [
        response_decls::<Project>("Project"),
        response_decls::<Service>("Service"),
        response_decls::<PricingPlan>("PricingPlan"),
        response_decls::<Faq>("Faq"),
        response_decls::<ResumeEntry>("ResumeEntry"),
        response_decls::<CustomPage>("CustomPage"),
    ];

    let body = decls
        .into_iter()
        .chain(responses.into_iter().flatten())
        .map(|decl| format!("export {}", decl.trim_start_matches("export ")))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{header}{body}\n")
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let check = args.iter().any(|arg| arg == "--check");
    let out = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("shared/types.ts"));

    let content = generate_types_content();
    if check {
        let current = fs::read_to_string(&out).unwrap_or_default();
        if current != content {
            eprintln!("{} is out of date, run generate_types", out.display());
            std::process::exit(1);
        }
        return Ok(());
    }

    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out, content)?;
    println!("Wrote {}", out.display());
    Ok(())
}

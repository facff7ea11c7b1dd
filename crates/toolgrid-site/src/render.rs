//! HTML matrix rendering.
//!
//! Assembles the complete static page: legend, source filters, tab structure
//! (gateway results vs library results, nested capability tabs), one matrix
//! table per capability, and reason tooltips on every non-successful cell.

use chrono::{DateTime, Utc};

use toolgrid_core::{
    build_unified_entries, classify_record, normalize_document, Capability, ModelRecord,
    ProviderRegistry, ReasonLimits, ResultDocument, UnifiedModelEntry, DIRECT_PROVIDER,
};

use crate::load::SiteInputs;

const STYLES: &str = include_str!("../templates/styles.css");
const SCRIPT: &str = include_str!("../templates/script.js");

const PAGE_TITLE: &str = "AI Model Capability Matrix";

/// Escape text for element content.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text for an HTML attribute value.
fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}

/// Join reasons for a cell tooltip, escaped for attribute context.
pub fn format_reasons_for_tooltip(reasons: &[String]) -> String {
    escape_attr(&reasons.join(" | "))
}

fn html_head(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n\
         <style>\n{}\n</style>\n\
         </head>",
        escape_text(title),
        STYLES
    )
}

fn legend() -> &'static str {
    r#"<div class="legend">
    <div class="legend-item"><div class="legend-color success-swatch"></div><span>3/3 Success</span></div>
    <div class="legend-item"><div class="legend-color partial-swatch"></div><span>1-2/3 Partial</span></div>
    <div class="legend-item"><div class="legend-color failure-swatch"></div><span>0/3 Failure</span></div>
    <div class="legend-item"><div class="legend-color none-swatch"></div><span>Not Available</span></div>
</div>"#
}

fn filter_controls() -> &'static str {
    r#"<div class="filter-controls">
    <h3>Filter by Source</h3>
    <div class="filter-checkboxes">
        <div class="filter-checkbox"><input type="checkbox" id="filter-router" checked><label for="filter-router">Router</label></div>
        <div class="filter-checkbox"><input type="checkbox" id="filter-hub" checked><label for="filter-hub">Hub</label></div>
        <div class="filter-checkbox"><input type="checkbox" id="filter-direct" checked><label for="filter-direct">Direct platform</label></div>
    </div>
</div>"#
}

fn table_headers(providers: &[&str]) -> String {
    let mut headers = String::from("<th class=\"model-header\">Model</th>");
    for (index, &provider) in providers.iter().enumerate() {
        headers.push_str(&format!(
            "<th class=\"provider-header\" data-provider=\"{}\" data-col-index=\"{}\">{}</th>",
            escape_attr(provider),
            index + 1,
            escape_text(provider)
        ));
    }
    headers
}

fn cell_html(status: &str, label: &str, reasons: Option<&[String]>) -> String {
    let tooltip = reasons.map(format_reasons_for_tooltip).unwrap_or_default();
    let mut cell = format!("<span class=\"cell {}\"", status);
    if !tooltip.is_empty() {
        cell.push_str(&format!(" title=\"{}\"", tooltip));
    }
    cell.push_str(&format!(">{}</span>", escape_text(label)));
    cell
}

fn table_row(
    entry: &UnifiedModelEntry,
    providers: &[&str],
    capability: Capability,
    limits: &ReasonLimits,
) -> String {
    let mut cells = format!(
        "<td class=\"model-name-cell\">{}</td>",
        escape_text(&entry.display_name)
    );

    for &provider in providers {
        let outcome = entry.classify(provider, capability, limits);
        cells.push_str(&format!(
            "<td class=\"provider-cell\" data-provider=\"{}\">{}</td>",
            escape_attr(provider),
            cell_html(
                outcome.status.as_str(),
                &outcome.label,
                outcome.reasons.as_deref()
            )
        ));
    }

    format!(
        "<tr data-platform=\"{}\">{}</tr>",
        entry.source.as_str(),
        cells
    )
}

fn matrix_table(
    entries: &[UnifiedModelEntry],
    providers: &[&str],
    capability: Capability,
    table_id: &str,
    limits: &ReasonLimits,
) -> String {
    let rows: String = entries
        .iter()
        .map(|entry| table_row(entry, providers, capability, limits))
        .collect();

    format!(
        "<div class=\"table-container\">\n\
         <table id=\"{}\">\n\
         <thead><tr>{}</tr></thead>\n\
         <tbody>{}</tbody>\n\
         </table>\n\
         </div>",
        table_id,
        table_headers(providers),
        rows
    )
}

fn library_row(record: &ModelRecord, capability: Capability, limits: &ReasonLimits) -> String {
    let display = match record {
        ModelRecord::Direct(direct) => direct
            .model_name
            .clone()
            .unwrap_or_else(|| direct.model_id.clone()),
        ModelRecord::ProviderList(listed) => listed.model_id.clone(),
    };

    let outcome = classify_record(Some(record), DIRECT_PROVIDER, capability, limits);
    format!(
        "<tr data-platform=\"direct\"><td class=\"model-name-cell\">{}</td>\
         <td class=\"provider-cell\" data-provider=\"{}\">{}</td></tr>",
        escape_text(&display),
        DIRECT_PROVIDER,
        cell_html(
            outcome.status.as_str(),
            &outcome.label,
            outcome.reasons.as_deref()
        )
    )
}

fn library_table(doc: &ResultDocument, capability: Capability, table_id: &str, limits: &ReasonLimits) -> String {
    let rows: String = doc
        .models
        .iter()
        .map(|record| library_row(record, capability, limits))
        .collect();

    format!(
        "<div class=\"table-container\">\n\
         <table id=\"{}\">\n\
         <thead><tr>{}</tr></thead>\n\
         <tbody>{}</tbody>\n\
         </table>\n\
         </div>",
        table_id,
        table_headers(&[DIRECT_PROVIDER]),
        rows
    )
}

/// The library tab: direct-platform results gathered through the vendor SDK.
fn library_content(doc: Option<&ResultDocument>, limits: &ReasonLimits) -> String {
    let Some(doc) = doc else {
        return "<div class=\"table-container\"><p class=\"empty-notice\">No library test results available.</p></div>".to_string();
    };

    let notice = "<div class=\"library-notice\"><strong>Library Results</strong><br>\
                  <span>Capabilities measured through the platform's client library, \
                  which may differ from direct HTTP API calls.</span></div>";

    let tool_table = library_table(doc, Capability::ToolCalls, "library-tool-support-table", limits);

    if !doc.has_structured_output() {
        return format!("{notice}\n{tool_table}");
    }

    let structured_table = library_table(
        doc,
        Capability::StructuredOutput,
        "library-structured-output-table",
        limits,
    );

    format!(
        "{notice}\n\
         <div class=\"nested-tabs\">\n\
         <div class=\"nested-tab active\" id=\"nested-tab-library-tool\">Tool Support</div>\n\
         <div class=\"nested-tab\" id=\"nested-tab-library-structured\">Structured Output</div>\n\
         </div>\n\
         <div class=\"nested-tab-content active\" id=\"content-library-tool\">\n{tool_table}\n</div>\n\
         <div class=\"nested-tab-content\" id=\"content-library-structured\">\n{structured_table}\n</div>"
    )
}

fn tabs_structure(
    entries: &[UnifiedModelEntry],
    providers: &[&str],
    has_structured: bool,
    library: Option<&ResultDocument>,
    limits: &ReasonLimits,
) -> String {
    let tool_table = matrix_table(
        entries,
        providers,
        Capability::ToolCalls,
        "tool-support-table",
        limits,
    );
    let library_pane = library_content(library, limits);

    let http_pane = if has_structured {
        let structured_table = matrix_table(
            entries,
            providers,
            Capability::StructuredOutput,
            "structured-output-table",
            limits,
        );
        format!(
            "<div class=\"nested-tabs\">\n\
             <div class=\"nested-tab active\" id=\"nested-tab-http-tool\">Tool Support</div>\n\
             <div class=\"nested-tab\" id=\"nested-tab-http-structured\">Structured Output</div>\n\
             </div>\n\
             <div class=\"nested-tab-content active\" id=\"content-http-tool\">\n{tool_table}\n</div>\n\
             <div class=\"nested-tab-content\" id=\"content-http-structured\">\n{structured_table}\n</div>"
        )
    } else {
        tool_table
    };

    format!(
        "<div class=\"tabs\">\n\
         <div class=\"tab active\" id=\"tab-http\">HTTP</div>\n\
         <div class=\"tab\" id=\"tab-library\">Library</div>\n\
         </div>\n\
         <div class=\"tab-content active\" id=\"content-http\">\n{http_pane}\n</div>\n\
         <div class=\"tab-content\" id=\"content-library\">\n{library_pane}\n</div>"
    )
}

fn footer(generated_at: DateTime<Utc>) -> String {
    format!(
        "<div class=\"footer\"><p>Last updated: {}</p></div>",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    )
}

fn page_end() -> String {
    format!("<script>\n{}\n</script>\n</body>\n</html>", SCRIPT)
}

/// Render the complete page from one set of inputs.
pub fn generate_site(mut inputs: SiteInputs, limits: &ReasonLimits) -> String {
    for doc in [
        inputs.router.as_mut(),
        inputs.hub.as_mut(),
        inputs.direct.as_mut(),
        inputs.direct_library.as_mut(),
    ]
    .into_iter()
    .flatten()
    {
        normalize_document(doc);
    }

    let provider_docs: Vec<&ResultDocument> =
        [inputs.router.as_ref(), inputs.hub.as_ref()]
            .into_iter()
            .flatten()
            .collect();
    let registry = ProviderRegistry::from_documents(provider_docs, inputs.direct.is_some());
    let providers: Vec<&str> = registry.names().collect();

    let generated_at = [
        inputs.router.as_ref(),
        inputs.hub.as_ref(),
        inputs.direct.as_ref(),
    ]
    .into_iter()
    .flatten()
    .map(|doc| doc.generated_at)
    .max()
    .unwrap_or_else(Utc::now);

    let entries = build_unified_entries(
        inputs.router.as_ref(),
        inputs.hub.as_ref(),
        inputs.direct.as_ref(),
        &inputs.identity,
    );
    let has_structured = entries
        .iter()
        .any(UnifiedModelEntry::has_structured_output);

    format!(
        "{}\n<body>\n<div class=\"container\">\n\
         <h1>{}</h1>\n\
         <div class=\"subtitle\">Tool calling and structured output support across router, hub, and direct-platform sources</div>\n\
         {}\n{}\n{}\n{}\n</div>\n{}",
        html_head(PAGE_TITLE),
        PAGE_TITLE,
        legend(),
        filter_controls(),
        tabs_structure(
            &entries,
            &providers,
            has_structured,
            inputs.direct_library.as_ref(),
            limits
        ),
        footer(generated_at),
        page_end()
    )
}

//! End-to-end extraction scenarios over real HTML.

use domnom::{
    extract, extract_from_html, ExtractError, ExtractionConfig, ExtractionPlan, Extractor,
    FieldSpec, Value,
};
use scraper::Html;

const PAGE: &str = r#"
    <html><body>
        <article>
            <h1 class="title">  Hello World  </h1>
            <span class="price"> 19.90 EUR </span>
            <span class="views"> 1,204 views </span>
            <p class="blurb">AT&amp;T is <b>big</b></p>
            <ul class="tags">
                <li>rust</li>
                <li>html</li>
                <li>extraction</li>
            </ul>
            <a class="next" href="/page/2">More</a>
            <input name="q" value="search term">
        </article>
    </body></html>
"#;

fn page() -> Html {
    Html::parse_document(PAGE)
}

fn output_of(config: ExtractionConfig<Html>) -> domnom::Output<ego_tree::NodeId> {
    extract_from_html(&page(), &config).unwrap()
}

#[test]
fn extracts_trimmed_title() {
    let config = ExtractionConfig::new().field(
        "title",
        FieldSpec::new().selector(".title").transform("inner-text").transform("trim"),
    );
    let output = output_of(config);
    assert_eq!(output["title"].as_str(), Some("Hello World"));
}

#[test]
fn false_condition_omits_field_from_output() {
    let config = ExtractionConfig::new()
        .field("title", FieldSpec::new().selector(".title").transform("inner-text"))
        .field(
            "hidden",
            FieldSpec::new()
                .selector(".title")
                .transform("inner-text")
                .condition(|| false),
        );
    let output = output_of(config);
    assert!(output.contains_key("title"));
    assert!(!output.contains_key("hidden"));
}

#[test]
fn numeric_chain_parses_price() {
    let config = ExtractionConfig::new().field(
        "price",
        FieldSpec::new()
            .selector(".price")
            .transform("inner-text")
            .transform("trim")
            .transform("to-float"),
    );
    let output = output_of(config);
    assert_eq!(output["price"], Value::Float(19.90));
}

#[test]
fn replace_descriptor_recognizes_regex_literal() {
    // Strip thousands separators before parsing.
    let config = ExtractionConfig::new().field(
        "views",
        FieldSpec::new()
            .selector(".views")
            .transform("inner-text")
            .transform("replace:/[^0-9]/g:")
            .transform("to-int"),
    );
    let output = output_of(config);
    assert_eq!(output["views"], Value::Int(1204));
}

#[test]
fn split_descriptor_with_limit() {
    let config = ExtractionConfig::new().field(
        "first_word",
        FieldSpec::new()
            .selector(".title")
            .transform("inner-text")
            .transform("trim")
            .transform("split: :2")
            .transform("get-index:0"),
    );
    let output = output_of(config);
    assert_eq!(output["first_word"].as_str(), Some("Hello"));
}

#[test]
fn select_all_and_get_index() {
    let html = page();
    let config = ExtractionConfig::new().field(
        "second_tag",
        FieldSpec::new()
            .transform("select-all:.tags li")
            .transform("get-index:1")
            .transform("inner-text"),
    );
    let output = extract_from_html(&html, &config).unwrap();
    assert_eq!(output["second_tag"].as_str(), Some("html"));
}

#[test]
fn slice_node_list() {
    let html = page();
    let config = ExtractionConfig::new().field(
        "tail_tags",
        FieldSpec::new().transform("select-all:.tags li").transform("slice:1"),
    );
    let output = extract_from_html(&html, &config).unwrap();
    match &output["tail_tags"] {
        Value::NodeList(nodes) => {
            let texts: Vec<String> =
                nodes.iter().map(|id| domnom::Document::inner_text(&html, id)).collect();
            assert_eq!(texts, vec!["html", "extraction"]);
        }
        other => panic!("expected node list, got {:?}", other),
    }
}

#[test]
fn get_attribute_and_form_value() {
    let config = ExtractionConfig::new()
        .field(
            "next_url",
            FieldSpec::new().selector("a.next").transform("get-attribute:href"),
        )
        .field("query", FieldSpec::new().selector("input").transform("value"));
    let output = output_of(config);
    assert_eq!(output["next_url"].as_str(), Some("/page/2"));
    assert_eq!(output["query"].as_str(), Some("search term"));
}

#[test]
fn missing_attribute_coerces_to_empty_string() {
    // The documented coercion of absence: Null stringifies to "".
    let config = ExtractionConfig::new().field(
        "missing",
        FieldSpec::new()
            .selector("a.next")
            .transform("get-attribute:data-x")
            .transform("to-string"),
    );
    let output = output_of(config);
    assert_eq!(output["missing"].as_str(), Some(""));
}

#[test]
fn absent_selection_yields_null_through_chain() {
    let config = ExtractionConfig::new().field(
        "nothing",
        FieldSpec::new().selector(".absent").transform("inner-text"),
    );
    let output = output_of(config);
    assert_eq!(output["nothing"], Value::Null);
}

#[test]
fn html_to_text_decodes_entities_and_strips_markup() {
    let config = ExtractionConfig::new().field(
        "blurb",
        FieldSpec::new().selector(".blurb").transform("inner-html").transform("html-to-text"),
    );
    let output = output_of(config);
    assert_eq!(output["blurb"].as_str(), Some("AT&T is big"));
}

#[test]
fn html_to_text_on_empty_markup_is_empty_string() {
    let html = page();
    let config = ExtractionConfig::new().field(
        "empty",
        FieldSpec::new()
            .transform_fn(|_doc: &Html, _value: Value<ego_tree::NodeId>| -> Result<Value<ego_tree::NodeId>, ExtractError> {
                Ok(Value::String(String::new()))
            })
            .transform("html-to-text"),
    );
    let output = extract_from_html(&html, &config).unwrap();
    assert_eq!(output["empty"].as_str(), Some(""));
}

#[test]
fn unknown_transformation_fails_whole_call() {
    let config = ExtractionConfig::new()
        .field("ok", FieldSpec::new().selector(".title").transform("inner-text"))
        .field("bad", FieldSpec::new().selector(".title").transform("bogus"));
    let err = extract_from_html(&page(), &config).unwrap_err();
    assert!(err.to_string().contains("bogus"));
    match err {
        ExtractError::TransformNotFound(name) => assert_eq!(name, "bogus"),
        other => panic!("expected TransformNotFound, got {:?}", other),
    }
}

#[test]
fn slice_on_number_aborts_the_call() {
    // get-index guards with a sentinel; slice deliberately does not.
    let config = ExtractionConfig::new().field(
        "boom",
        FieldSpec::new()
            .selector(".price")
            .transform("inner-text")
            .transform("trim")
            .transform("to-float")
            .transform("round")
            .transform("slice:0"),
    );
    let err = extract_from_html(&page(), &config).unwrap_err();
    assert!(matches!(err, ExtractError::ExecutionError { .. }));
}

#[test]
fn invalid_selector_aborts_the_call() {
    let config = ExtractionConfig::new().field("bad", FieldSpec::<Html>::new().selector(":::"));
    let err = extract_from_html(&page(), &config).unwrap_err();
    assert!(matches!(err, ExtractError::InvalidSelector { .. }));
}

#[test]
fn custom_transformation_registered_before_extraction() {
    let html = page();
    let mut extractor = Extractor::new();
    extractor.registry_mut().register("upper", |_doc: &Html, value: Value<ego_tree::NodeId>| -> Result<Value<ego_tree::NodeId>, ExtractError> {
        Ok(match value {
            Value::String(s) => Value::String(s.to_uppercase()),
            _ => Value::Inapplicable,
        })
    });
    let config = ExtractionConfig::new().field(
        "loud_title",
        FieldSpec::new()
            .selector(".title")
            .transform("inner-text")
            .transform("trim")
            .transform("upper"),
    );
    let output = extractor.extract(&html, html.root_element().id(), &config).unwrap();
    assert_eq!(output["loud_title"].as_str(), Some("HELLO WORLD"));
}

#[test]
fn plan_loaded_from_yaml_extracts_end_to_end() {
    let plan = ExtractionPlan::from_yaml_str(
        r#"
fields:
  title:
    selector: ".title"
    transformations: ["inner-text", "trim"]
  tags:
    transformations: ["select-all:.tags li", "get-index:0", "inner-text"]
  price_cents:
    selector: ".price"
    transformations: ["inner-text", "to-float", "multiply-by:100", "round"]
"#,
    )
    .unwrap();

    let html = page();
    let output = extract(&html, html.root_element().id(), &plan.to_config()).unwrap();
    assert_eq!(output["title"].as_str(), Some("Hello World"));
    assert_eq!(output["tags"].as_str(), Some("rust"));
    assert_eq!(output["price_cents"], Value::Int(1990));
}

use super::*;

// -----------------------------------------------------------------------
// Title
// -----------------------------------------------------------------------

#[test]
fn title_prefers_og_meta() {
    let html = r#"
        <meta property="og:title" content="Fancy Kettle &amp; Lid" />
        <span id="productTitle"> Span Title </span>
        <title>Tag Title</title>
    "#;
    assert_eq!(
        extract_fields(html).title.as_deref(),
        Some("Fancy Kettle & Lid")
    );
}

#[test]
fn title_meta_tolerates_swapped_attribute_order() {
    let html = r#"<meta content="Swapped Kettle" property="og:title" />"#;
    assert_eq!(extract_fields(html).title.as_deref(), Some("Swapped Kettle"));
}

#[test]
fn title_falls_back_to_product_span() {
    let html = r#"<span id="productTitle">
        Steel   Kettle,
        2&#39;L
    </span>"#;
    assert_eq!(
        extract_fields(html).title.as_deref(),
        Some("Steel Kettle, 2'L")
    );
}

#[test]
fn title_falls_back_to_title_tag_with_tags_stripped() {
    let html = "<title>Kettle <b>Deluxe</b> &quot;Pro&quot;</title>";
    assert_eq!(
        extract_fields(html).title.as_deref(),
        Some("Kettle Deluxe \"Pro\"")
    );
}

#[test]
fn title_absent_when_no_signal() {
    let html = "<html><body><p>nothing to see</p></body></html>";
    assert_eq!(extract_fields(html).title, None);
}

#[test]
fn empty_og_title_does_not_shadow_later_strategies() {
    let html = r#"
        <meta property="og:title" content="" />
        <title>Real Title</title>
    "#;
    assert_eq!(extract_fields(html).title.as_deref(), Some("Real Title"));
}

// -----------------------------------------------------------------------
// Description
// -----------------------------------------------------------------------

#[test]
fn description_prefers_meta_description() {
    let html = r#"
        <meta name="description" content="A kettle for tea." />
        <div id="feature-bullets"><li>ignored</li></div>
    "#;
    assert_eq!(
        extract_fields(html).description.as_deref(),
        Some("A kettle for tea.")
    );
}

#[test]
fn description_falls_back_to_feature_bullets() {
    let html = r#"
        <div id="feature-bullets">
            <ul><li>Boils fast</li><li>Holds 2L</li></ul>
        </div>
    "#;
    assert_eq!(
        extract_fields(html).description.as_deref(),
        Some("Boils fast Holds 2L")
    );
}

// -----------------------------------------------------------------------
// Image
// -----------------------------------------------------------------------

#[test]
fn image_prefers_json_ld_string() {
    let html = r#"
        <script type="application/ld+json">{"@type":"Product","image":"https://m.media-amazon.com/images/I/ld.jpg"}</script>
        <meta property="og:image" content="https://m.media-amazon.com/images/I/og.jpg" />
    "#;
    assert_eq!(
        extract_fields(html).image_url.as_deref(),
        Some("https://m.media-amazon.com/images/I/ld.jpg")
    );
}

#[test]
fn image_json_ld_takes_first_array_element() {
    let html = r#"<script type="application/ld+json">
        [{"@type":"Product","image":["https://m.media-amazon.com/images/I/a.jpg","https://m.media-amazon.com/images/I/b.jpg"]}]
    </script>"#;
    assert_eq!(
        extract_fields(html).image_url.as_deref(),
        Some("https://m.media-amazon.com/images/I/a.jpg")
    );
}

#[test]
fn image_json_ld_malformed_block_falls_through() {
    let html = r#"
        <script type="application/ld+json">{not json at all</script>
        <meta property="og:image" content="https://m.media-amazon.com/images/I/og.jpg" />
    "#;
    assert_eq!(
        extract_fields(html).image_url.as_deref(),
        Some("https://m.media-amazon.com/images/I/og.jpg")
    );
}

#[test]
fn image_prefers_secure_og_variant() {
    let html = r#"
        <meta property="og:image:secure_url" content="https://m.media-amazon.com/images/I/secure.jpg" />
        <meta property="og:image" content="http://m.media-amazon.com/images/I/plain.jpg" />
    "#;
    assert_eq!(
        extract_fields(html).image_url.as_deref(),
        Some("https://m.media-amazon.com/images/I/secure.jpg")
    );
}

#[test]
fn image_from_dynamic_attr_takes_first_key() {
    let html = r#"<img id="landingImage"
        data-a-dynamic-image="{&quot;https://m.media-amazon.com/images/I/first.jpg&quot;:[500,500],&quot;https://m.media-amazon.com/images/I/second.jpg&quot;:[300,300]}"
        src="x" />"#;
    assert_eq!(
        extract_fields(html).image_url.as_deref(),
        Some("https://m.media-amazon.com/images/I/first.jpg")
    );
}

#[test]
fn image_last_resort_scans_for_media_cdn_url() {
    let html = r#"<div style="background:url(https://m.media-amazon.com/images/I/bg._SL500_.jpg)"></div>"#;
    assert_eq!(
        extract_fields(html).image_url.as_deref(),
        Some("https://m.media-amazon.com/images/I/bg._SL500_.jpg")
    );
}

#[test]
fn image_absent_when_nothing_matches() {
    assert_eq!(extract_fields("<html></html>").image_url, None);
}

// -----------------------------------------------------------------------
// Category
// -----------------------------------------------------------------------

#[test]
fn category_prefers_site_name_meta() {
    let html = r#"<meta property="og:site_name" content="Kitchen &amp; Home" />"#;
    assert_eq!(
        extract_fields(html).category.as_deref(),
        Some("Kitchen & Home")
    );
}

#[test]
fn category_falls_back_to_breadcrumb_li() {
    let html = r#"<li class="a-breadcrumb-item"><a href="/kitchen">Kitchen</a></li>"#;
    assert_eq!(extract_fields(html).category.as_deref(), Some("Kitchen"));
}

#[test]
fn category_falls_back_to_breadcrumb_anchor() {
    let html = r#"<a class="breadcrumb-link" href="/garden">Garden Tools</a>"#;
    assert_eq!(
        extract_fields(html).category.as_deref(),
        Some("Garden Tools")
    );
}

#[test]
fn category_absent_when_nothing_matches() {
    assert_eq!(extract_fields("<p>no category here</p>").category, None);
}

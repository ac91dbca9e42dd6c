// Integration tests for locators and assertions on the Form Layouts page
//
// Tests cover:
// - CSS, attribute, XPath and text-engine selectors
// - User-facing locators (role, label, placeholder, test id, text, title)
// - Child and parent locating, including `has` / `has_text` filters
// - Reusing locators and extracting values
// - Immediate, auto-retrying and soft assertions

mod common;

use common::Harness;
use ngx_e2e::pages::FormLayoutsPage;
use ngx_e2e::{
    ElementLocator, Error, FailureKind, Filter, MenuRoute, NavigationPage, PageHandle, Selector,
    SoftAssertions, expect, verify, verify_contains, verify_eq,
};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_locator_syntax_rules() -> anyhow::Result<()> {
    let h = Harness::at(MenuRoute::FormLayouts).await?;
    let page = &h.page;

    // By tag name
    page.locator(Selector::css("input")).first().click(None).await?;

    // By id, class, attribute, full class value, combination
    expect(page.locator(Selector::css("#inputEmail1"))).to_have_count(1).await?;
    expect(page.locator(Selector::css(".shape-rectangle")).first()).to_be_visible().await?;
    expect(page.locator(Selector::css(r#"[placeholder="Email"]"#)))
        .to_have_count(4)
        .await?;
    expect(page.locator(Selector::css(
        r#"[class="input-full-width size-medium status-basic shape-rectangle nb-transition"]"#,
    )))
    .to_have_count(4)
    .await?;
    expect(page.locator(Selector::css(r#"input[placeholder="Email"][nbinput]"#)))
        .to_have_count(4)
        .await?;

    // XPath
    expect(page.locator(Selector::xpath(r#"//*[@id="inputEmail1"]"#)))
        .to_have_attribute("placeholder", "Email")
        .await?;

    // Partial and exact text
    expect(page.locator(Selector::css(r#":text("Using")"#)).first()).to_be_visible().await?;
    expect(page.locator(Selector::css(r#":text-is("Using the Grid")"#)))
        .to_have_count(1)
        .await?;

    h.finish().await
}

#[tokio::test]
async fn test_user_facing_locators() -> anyhow::Result<()> {
    let h = Harness::at(MenuRoute::FormLayouts).await?;
    let page = &h.page;

    page.locator(Selector::role("textbox").name("Email"))
        .first()
        .click(None)
        .await?;
    page.locator(Selector::role("button").name("Sign in"))
        .first()
        .click(None)
        .await?;
    page.locator(Selector::label("Email")).first().click(None).await?;
    page.locator(Selector::test_id("SignIn")).click(None).await?;
    page.locator(Selector::placeholder("Jane Doe")).first().click(None).await?;
    page.locator(Selector::text("Using the Grid")).first().click(None).await?;

    // The title locator hits the sidebar link, which leaves Form Layouts
    page.locator(Selector::title("IoT Dashboard")).first().click(None).await?;
    expect(page.locator(Selector::css("nb-card-header")))
        .to_have_text("Temperature")
        .await?;

    h.finish().await
}

#[tokio::test]
async fn test_locating_child_elements() -> anyhow::Result<()> {
    let h = Harness::at(MenuRoute::FormLayouts).await?;
    let page = &h.page;

    page.locator(Selector::css(r#"nb-card nb-radio :text-is("Option 1")"#))
        .click(None)
        .await?;
    let option_1 = page.locator(Selector::role("radio").name("Option 1"));
    expect(option_1.clone()).to_be_checked().await?;

    // Chained form of the same lookup
    page.locator(Selector::css("nb-card"))
        .locator(Selector::css("nb-radio"))
        .locator(Selector::css(r#":text-is("Option 2")"#))
        .click(None)
        .await?;
    expect(option_1).to_be_unchecked().await?;

    page.locator(Selector::css("nb-card"))
        .locator(Selector::role("button").name("Sign in"))
        .first()
        .click(None)
        .await?;

    // Zero-based: the fourth card is the Basic form with a single button
    let fourth_card_button = page
        .locator(Selector::css("nb-card"))
        .nth(3)
        .locator(Selector::role("button"));
    expect(fourth_card_button.clone()).to_have_text("Submit").await?;
    fourth_card_button.click(None).await?;

    h.finish().await
}

#[tokio::test]
async fn test_locating_parents() -> anyhow::Result<()> {
    let h = Harness::at(MenuRoute::FormLayouts).await?;
    let page = &h.page;
    let email = || Selector::role("textbox").name("Email");

    // has_text is case-insensitive
    page.locator(Selector::css("nb-card").has_text("Using the grid").then(email()))
        .click(None)
        .await?;
    page.locator(
        Selector::css("nb-card")
            .has(Selector::css("#inputEmail1"))
            .then(email()),
    )
    .click(None)
    .await?;

    page.locator(Selector::css("nb-card"))
        .filter(Filter::HasText("Basic form".into()))
        .locator(email())
        .click(None)
        .await?;
    page.locator(Selector::css("nb-card"))
        .filter(Filter::Has(Selector::css(".status-danger")))
        .locator(Selector::role("textbox").name("Password"))
        .click(None)
        .await?;

    // Only the Horizontal form has both a checkbox and a "Sign in" button
    let horizontal_sign_in = page
        .locator(Selector::css("nb-card"))
        .filter(Filter::Has(Selector::css("nb-checkbox")))
        .filter(Filter::HasText("Sign In".into()))
        .locator(Selector::role("button").name("Sign in"));
    expect(horizontal_sign_in.clone()).to_have_count(1).await?;
    horizontal_sign_in.click(None).await?;

    // One level up from the card header
    page.locator(
        Selector::css(r#":text-is("Using the Grid")"#)
            .parent()
            .then(email()),
    )
    .click(None)
    .await?;

    h.finish().await
}

#[tokio::test]
async fn test_reusing_locators() -> anyhow::Result<()> {
    let h = Harness::at(MenuRoute::FormLayouts).await?;
    let forms = FormLayoutsPage::new(&h.page);

    let basic_form = forms.basic_form();
    let email = basic_form.locator(Selector::role("textbox").name("Email"));
    let password = basic_form.locator(Selector::role("textbox").name("Password"));
    let submit = basic_form.locator(Selector::role("button").name("Submit"));
    let test_email = "Uma@musume.com";

    email.fill(test_email, None).await?;
    password.fill("Maruzensky", None).await?;
    basic_form.locator(Selector::css("nb-checkbox")).click(None).await?;
    submit.click(None).await?;

    expect(email).to_have_value(test_email).await?;
    expect(password).to_have_value("Maruzensky").await?;
    expect(basic_form.locator(Selector::role("checkbox")))
        .to_be_checked()
        .await?;

    h.finish().await
}

#[tokio::test]
async fn test_extracting_values() -> anyhow::Result<()> {
    let h = Harness::at(MenuRoute::FormLayouts).await?;
    let page = &h.page;
    let basic_form = FormLayoutsPage::new(page).basic_form();

    let button_text = basic_form
        .locator(Selector::role("button"))
        .text_content()
        .await?;
    verify_eq("Basic form button text", button_text.as_deref(), Some("Submit"))?;

    let radio_texts = page.locator(Selector::css("nb-radio")).all_text_contents().await?;
    verify_contains("radio labels", &radio_texts, "Option 1")?;
    verify_eq("radio count", radio_texts.len(), 3)?;

    let email = basic_form.locator(Selector::role("textbox").name("Email"));
    email.fill("Uma@musume.com", None).await?;
    verify_eq("email value", email.input_value().await?, "Uma@musume.com")?;

    let placeholder = email.get_attribute("placeholder").await?;
    verify_eq("email placeholder", placeholder.as_deref(), Some("Email"))?;

    h.finish().await
}

#[tokio::test]
async fn test_assertions() -> anyhow::Result<()> {
    let h = Harness::at(MenuRoute::FormLayouts).await?;
    let button = FormLayoutsPage::new(&h.page)
        .basic_form()
        .locator(Selector::css("button"));

    // Immediate
    let text = button.text_content().await?;
    verify_eq("button text", text.as_deref(), Some("Submit"))?;

    // Auto-retrying
    expect(button.clone()).to_have_text("Submit").await?;
    expect(button.clone()).not().to_have_text("Submit123").await?;

    // Soft: the failure is recorded and the click still happens
    let soft = SoftAssertions::new();
    let passed = soft.check(expect(button.clone()).to_have_text("Submit123").await);
    verify("soft assertion outcome", !passed)?;
    button.click(None).await?;
    verify_eq("soft failures", soft.failure_count(), 1)?;

    match soft.finish() {
        Err(Error::SoftAssertions(failures)) => {
            verify_eq("recorded failures", failures.len(), 1)?;
            verify_eq("failure kind", failures[0].kind(), FailureKind::Timeout)?;
            verify(
                "failure names the expected text",
                failures[0].to_string().contains("Submit123"),
            )?;
        }
        other => anyhow::bail!("expected a soft assertion failure, got {:?}", other),
    }

    h.finish().await
}

#[tokio::test]
async fn test_configured_assertion_timeout_applies() -> anyhow::Result<()> {
    let h = Harness::start_with(|config| config.assertion_timeout_ms = 300).await?;
    h.page.goto(&h.config.app_url("")?).await?;
    NavigationPage::new(&h.page).form_layouts_page().await?;
    let button = FormLayoutsPage::new(&h.page)
        .basic_form()
        .locator(Selector::css("button"));

    let started = Instant::now();
    let err = expect(button.clone())
        .to_have_text("Submit123")
        .await
        .unwrap_err();
    verify("failed within the configured timeout", started.elapsed() < Duration::from_secs(3))?;
    verify_eq("failure kind", err.kind(), FailureKind::Timeout)?;
    verify("message names the timeout", err.to_string().contains("after 300ms"))?;

    // Sub-locators carry the same default; with_timeout still overrides it
    expect(FormLayoutsPage::new(&h.page).basic_form().locator(Selector::css("button")))
        .with_timeout(Duration::from_secs(5))
        .to_have_text("Submit")
        .await?;

    h.finish().await
}

#[tokio::test]
async fn test_immediate_assertion_reports_mismatch() -> anyhow::Result<()> {
    let h = Harness::at(MenuRoute::FormLayouts).await?;
    let button = FormLayoutsPage::new(&h.page)
        .basic_form()
        .locator(Selector::css("button"));

    let text = button.text_content().await?.unwrap_or_default();
    let err = verify_eq("button text", text.as_str(), "Submit123").unwrap_err();
    verify_eq("failure kind", err.kind(), FailureKind::Mismatch)?;

    h.finish().await
}

//! HTML page and card rendering.
//!
//! Four templates, all pure functions of their input and the
//! [`GalleryConfig`]: the same record always renders to the same bytes.
//!
//! | Renderer | Output | Lives in |
//! |----------|--------|----------|
//! | [`render_artwork_page`] | Artwork detail page | project root |
//! | [`render_collection_page`] | Collection page with its artwork grid | collections dir |
//! | [`render_gallery_card`] | `a.art-card` for an art grid | index or collection page |
//! | [`render_collection_card`] | `a.series-card` for the series grid | index |
//!
//! ## Escaping
//!
//! Prompt answers are escaped by [maud](https://maud.lambda.xyz/) like any
//! other interpolated value. Setting `render.escape_html = false` switches
//! element text (titles, descriptions, prices, specs) to verbatim insertion so
//! an operator can put markup into a description on purpose. Attribute values
//! are always escaped.
//!
//! ## Scripts
//!
//! Page behavior lives in `static/*.js`, embedded at compile time. The parts
//! that vary per page (email identifiers, the carousel image list) are emitted
//! as a JSON `GALLERY` object just before the script.

use crate::config::{EmailConfig, GalleryConfig, RenderConfig, SiteConfig};
use crate::naming::sanitize_filename;
use crate::types::{Artwork, ArtworkDetails, Collection};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const COLLECTION_JS: &str = include_str!("../static/collection.js");
const ARTWORK_JS: &str = include_str!("../static/artwork.js");

const EMAIL_CLIENT_SRC: &str = "https://cdn.jsdelivr.net/npm/@emailjs/browser@4/dist/email.min.js";
const FONTS: &[&str] = &[
    "https://fonts.googleapis.com/css2?family=Quicksand:wght@300..700&family=Tangerine:wght@400;700&display=swap",
    "https://fonts.googleapis.com/css2?family=Montserrat:ital,wght@0,100..900;1,100..900&display=swap",
];
const ICONS_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css";

/// Footer decoration: (size, top %, left %, animation delay s).
const STARS: &[(&str, u8, u8, &str)] = &[
    ("small", 10, 20, "0s"),
    ("medium", 15, 70, "0.7s"),
    ("small", 25, 40, "1.4s"),
    ("medium", 30, 85, "0.3s"),
    ("small", 40, 15, "1.1s"),
    ("medium", 45, 55, "1.8s"),
    ("small", 55, 30, "0.5s"),
    ("medium", 60, 75, "1.2s"),
    ("small", 70, 10, "1.9s"),
    ("medium", 75, 45, "0.8s"),
    ("small", 80, 80, "1.5s"),
    ("medium", 85, 25, "0.2s"),
    ("small", 90, 60, "1.6s"),
];

// ============================================================================
// Helpers
// ============================================================================

/// Element text from a prompt answer, honoring `render.escape_html`.
fn text(value: &str, render: &RenderConfig) -> Markup {
    if render.escape_html {
        html! { (value) }
    } else {
        PreEscaped(value.to_string())
    }
}

/// Keep a value from closing the CSS declaration or the `<style>` element it
/// is written into.
fn css_value(value: &str, render: &RenderConfig) -> String {
    if render.escape_html {
        value
            .chars()
            .filter(|c| !matches!(c, '<' | '>' | '"' | '{' | '}' | ';' | '\\' | '\n' | '\r'))
            .collect()
    } else {
        value.to_string()
    }
}

/// First `max` characters of `text`, with `...` appended when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// `../` once per directory level of `dir`, for links from a page in `dir`
/// back to the project root.
fn up_prefix(dir: &str) -> String {
    dir.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .map(|_| "../")
        .collect()
}

/// Inline `GALLERY` object read by the page scripts. `</` is escaped so a
/// value can never end the script element.
fn script_config(value: serde_json::Value) -> Markup {
    let json = value.to_string().replace("</", "<\\/");
    html! {
        script { (PreEscaped(format!("const GALLERY = {json};"))) }
    }
}

fn email_client(email: &EmailConfig) -> Markup {
    let key = serde_json::Value::from(email.public_key.as_str())
        .to_string()
        .replace("</", "<\\/");
    html! {
        script src=(EMAIL_CLIENT_SRC) {}
        script { (PreEscaped(format!("emailjs.init({key});"))) }
    }
}

fn head(title: &str, stylesheet: &str, email: &EmailConfig, extra: Markup) -> Markup {
    html! {
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            title { (title) }
            link rel="stylesheet" href=(stylesheet);
            @for font in FONTS {
                link href=(font) rel="stylesheet";
            }
            (extra)
            (email_client(email))
        }
    }
}

/// Top bar plus the off-screen menu used on narrow screens.
fn site_nav(site: &SiteConfig, links: &[(&str, String)]) -> Markup {
    let items = html! {
        @for (label, href) in links {
            li { a href=(href) { (label) } }
        }
    };
    html! {
        nav {
            div.site-name { (site.name) }
            ul.nav-links { (items) }
            input.hamburger-toggle type="checkbox" id="hamburger-toggle";
            label.hamburger for="hamburger-toggle" {
                div.line {}
                div.line {}
                div.line {}
            }
        }
        div.off-screen-menu {
            ul { (items) }
        }
    }
}

fn arrow(id: &str, side: &str, points: &str) -> Markup {
    html! {
        button class=(format!("nav-arrow nav-arrow-{side}")) id=(id) {
            svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor"
                stroke-width="2" stroke-linecap="round" stroke-linejoin="round" {
                polyline points=(points) {}
            }
        }
    }
}

fn form_field(label: &str, id: &str, kind: &str, placeholder: &str, required: bool) -> Markup {
    let label = if required { format!("{label} *") } else { label.to_string() };
    html! {
        div.form-group {
            label for=(id) { (label) }
            @if kind == "textarea" {
                textarea id=(id) name=(id) rows="4" required[required] placeholder=(placeholder) {}
            } @else {
                input type=(kind) id=(id) name=(id) required[required] placeholder=(placeholder);
            }
        }
    }
}

fn copyright(site: &SiteConfig) -> Markup {
    html! {
        p { "© " (site.copyright_year) " " (site.name) ". All rights reserved." }
    }
}

// ============================================================================
// Cards
// ============================================================================

/// Card for an artwork in an art grid.
///
/// `link_prefix` is prepended to the page link and image path: empty on the
/// index, `../` on a collection page one directory down.
pub fn render_gallery_card(artwork: &Artwork, link_prefix: &str, config: &GalleryConfig) -> Markup {
    let render = &config.render;
    html! {
        a href={ (link_prefix) (artwork.filename) } class=(config.markup.art_card_class) {
            div.art-image-container {
                img.art-image src={ (link_prefix) (artwork.image) } alt=(artwork.title);
                div.art-overlay {
                    span.view-details { "View Details" }
                }
            }
            div.art-info {
                h3.art-name { (text(&artwork.title, render)) }
                p.art-description { (text(&artwork.description, render)) }
                div.art-footer {
                    p.art-price { (text(&artwork.price, render)) }
                    span.art-status { (text(&artwork.availability, render)) }
                }
            }
        }
    }
}

/// Link from the index to a collection page (`collections/final-test.html`).
pub fn collection_href(collection: &Collection, config: &GalleryConfig) -> String {
    let dir = config.paths.collections_dir.trim_end_matches('/');
    if dir.is_empty() || dir == "." {
        collection.filename.clone()
    } else {
        format!("{dir}/{}", collection.filename)
    }
}

/// Summary card for a collection in the index's series grid.
///
/// Shows up to two preview images (the first two artworks), the artwork and
/// available counts, and the description cut to `render.preview_length`
/// characters.
pub fn render_collection_card(collection: &Collection, config: &GalleryConfig) -> Markup {
    let render = &config.render;
    let description = truncate_chars(&collection.description, render.preview_length);
    html! {
        a href=(collection_href(collection, config)) class=(config.markup.series_card_class) {
            div.series-preview {
                div.preview-images {
                    @for (i, artwork) in collection.artworks.iter().take(2).enumerate() {
                        img src=(artwork.image) alt=(artwork.title)
                            class=(format!("preview-img preview-img-{}", i + 1));
                    }
                }
                div.series-overlay {
                    span.view-collection { "View Collection" }
                }
            }
            div.series-info {
                h3.series-name { (text(&collection.name, render)) }
                div.series-stats {
                    span.series-count { (collection.artworks.len()) " Artworks" }
                    span.series-available { (collection.available_count()) " Available" }
                }
                p.series-description { (text(&description, render)) }
            }
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// A collection page: header, the collection's artwork grid, a contact form
/// and the site footer.
pub fn render_collection_page(collection: &Collection, config: &GalleryConfig) -> Markup {
    let render = &config.render;
    let site = &config.site;
    let up = up_prefix(&config.paths.collections_dir);

    let background = format!(
        "body {{\n  background:\n    linear-gradient(to bottom, {}, rgba(0, 0, 0, 1)),\n    url(\"{}\");\n  background-size: cover;\n  background-position: center;\n  background-attachment: fixed;\n}}\n",
        css_value(&collection.background_overlay, render),
        css_value(&collection.background_image, render),
    );
    let extra = html! {
        link rel="stylesheet" href=(ICONS_CSS);
    };
    let links = [("Home", format!("{up}index.html")), ("Contact", "#contact".to_string())];

    html! {
        (DOCTYPE)
        html lang="en" {
            (head(&format!("{} Gallery - {}", site.name, collection.name), "collections.css", &config.email, extra))
            body {
                style { (PreEscaped(background)) }
                (site_nav(site, &links))
                main.gallery-container {
                    section.gallery-section #gallery {
                        div.section-header {
                            h2 { (text(&collection.name, render)) }
                            p { (text(&collection.description, render)) }
                        }
                        div.art-grid {
                            @for artwork in &collection.artworks {
                                (render_gallery_card(artwork, &up, config))
                            }
                        }
                    }
                    section.contact-section #contact {
                        div.contact-container {
                            div.contact-info {
                                h2 { "Interested in buying the collection?" }
                                p { "Have a question about an artwork or this collection? I'd love to hear from you." }
                                div.contact-details {
                                    div.contact-item {
                                        span.contact-icon { "📧" }
                                        div {
                                            h3 { "Email" }
                                            p { (site.contact_email) }
                                        }
                                    }
                                }
                            }
                            div.contact-form {
                                form #contactForm {
                                    h3 { "Send a Message" }
                                    div.form-group {
                                        input type="text" placeholder="Your Name" name="contactName" id="contactName" required;
                                    }
                                    div.form-group {
                                        input type="email" placeholder="Your Email" name="contactEmail" id="contactEmail" required;
                                    }
                                    div.form-group {
                                        textarea placeholder="Your Message" name="contactMessage" id="contactMessage" rows="3" required {}
                                    }
                                    button.submit-btn type="submit" { "Send Message" }
                                }
                            }
                        }
                    }
                }
                footer {
                    div.stars-container.footer-stars {
                        @for (size, top, left, delay) in STARS {
                            div class=(format!("star star-{size}"))
                                style=(format!("top: {top}%; left: {left}%; animation-delay: {delay}")) {}
                        }
                    }
                    div.footer-content {
                        div.footer-section {
                            h3 { (site.name) }
                            p { (site.tagline) }
                        }
                        div.footer-section {
                            h4 { "Quick Links" }
                            ul {
                                li { a href={ (up) "index.html" } { "Home" } }
                                li { a href="#gallery" { "Gallery" } }
                                li { a href="#contact" { "Contact" } }
                            }
                        }
                        div.footer-section {
                            h4 { "Follow" }
                            p { "Stay connected for new works!" }
                            div.social-links {
                                a.social-icon.instagram href=(site.instagram) target="_blank" {
                                    i.fab.fa-instagram {}
                                }
                                a.social-icon.facebook href=(site.facebook) target="_blank" {
                                    i.fab.fa-facebook-f {}
                                }
                            }
                        }
                    }
                    div.footer-bottom { (copyright(site)) }
                }
                (script_config(serde_json::json!({
                    "serviceId": config.email.service_id,
                    "contactTemplate": config.email.contact_template,
                })))
                script { (PreEscaped(COLLECTION_JS)) }
            }
        }
    }
}

/// An artwork detail page: image carousel, description, specification list,
/// and the purchase and contact modals.
pub fn render_artwork_page(details: &ArtworkDetails, config: &GalleryConfig) -> Markup {
    let render = &config.render;
    let site = &config.site;
    let links = [
        ("Home", "index.html".to_string()),
        ("Gallery", "index.html#gallery".to_string()),
        ("Contact", "index.html#contact".to_string()),
    ];
    let specs = [
        ("Medium", &details.medium),
        ("Dimensions", &details.dimensions),
        ("Year", &details.year),
        ("Frame", &details.frame),
    ];
    let status_class = format!("spec-value status-{}", sanitize_filename(&details.availability));

    html! {
        (DOCTYPE)
        html lang="en" {
            (head(&format!("{} - {} Gallery", details.title, site.name), "artwork-style.css", &config.email, html! {}))
            body {
                (site_nav(site, &links))
                main {
                    div.artwork-hero {
                        div.image-container {
                            (arrow("prevImage", "left", "15 18 9 12 15 6"))
                            img.artwork-image #mainImage src=(details.main_image()) alt=(details.title);
                            (arrow("nextImage", "right", "9 18 15 12 9 6"))
                            div.image-counter #imageCounter { "1 / " (details.images.len()) }
                        }
                        div.thumbnail-container #thumbnailContainer {}
                    }
                    div.artwork-details {
                        div.details-grid {
                            div.main-info {
                                h1.artwork-title { (text(&details.title, render)) }
                                p.artwork-price { (text(&details.price, render)) }
                                div.description-section {
                                    h2 { "Description" }
                                    @for paragraph in &details.paragraphs {
                                        p { (text(paragraph, render)) }
                                    }
                                }
                                div.cta-buttons {
                                    button.btn-primary #purchaseBtn { "Request Purchase" }
                                    button.btn-secondary #contactBtn { "Contact me" }
                                }
                            }
                            div.specifications {
                                h2 { "Specifications" }
                                @for (label, value) in specs {
                                    div.spec-item {
                                        span.spec-label { (label) ":" }
                                        span.spec-value { (text(value, render)) }
                                    }
                                }
                                div.spec-item {
                                    span.spec-label { "Availability:" }
                                    span class=(status_class) { (text(&details.availability, render)) }
                                }
                            }
                        }
                    }
                }
                div.modal #purchaseModal {
                    div.modal-content {
                        span.close { "×" }
                        h2 { "Request Purchase" }
                        p.modal-subtitle { "Complete the form below to initiate a secure purchase" }
                        form #purchaseForm {
                            input type="hidden" name="artwork" value=(details.title);
                            div.form-section {
                                h3 { "Personal Information" }
                                (form_field("Full Name", "fullName", "text", "John Doe", true))
                                (form_field("Email Address", "email", "email", "john@example.com", true))
                                (form_field("Phone Number", "phone", "tel", "+1 (555) 000-0000", true))
                            }
                            div.form-section {
                                h3 { "Shipping Information" }
                                (form_field("Street Address", "address", "text", "123 Main Street", true))
                                div.form-row {
                                    (form_field("City", "city", "text", "New York", true))
                                    (form_field("State/Province", "state", "text", "NY", true))
                                }
                                div.form-row {
                                    (form_field("ZIP/Postal Code", "zip", "text", "10001", true))
                                    (form_field("Country", "country", "text", "United States", true))
                                }
                            }
                            div.form-section {
                                h3 { "Additional Information" }
                                (form_field("Message (Optional)", "message", "textarea", "Any special requests or questions...", false))
                            }
                            div.payment-options {
                                div.payment-option {
                                    input type="radio" id="directContact" name="paymentMethod" value="contact";
                                    label for="directContact" {
                                        span.option-title { "Direct Contact" }
                                        span.option-desc { "I will reach out back to you directly to arrange payment and delivery" }
                                    }
                                }
                            }
                            div.form-actions {
                                button.btn-cancel type="button" #cancelBtn { "Cancel" }
                                button.btn-submit type="submit" { "Submit Request" }
                            }
                        }
                    }
                }
                div.modal #contactModal {
                    div.modal-content {
                        span.close { "×" }
                        h2 { "Contact me" }
                        p.modal-subtitle { "I'll be happy to respond to your questions or comments." }
                        form #contactForm {
                            (form_field("Name", "contactName", "text", "Your name", true))
                            (form_field("Email", "contactEmail", "email", "your@email.com", true))
                            (form_field("Message", "contactMessage", "textarea", "Ask about the artwork, shipping, or any other questions...", true))
                            div.form-actions {
                                button.btn-cancel type="button" #contactCancelBtn { "Cancel" }
                                button.btn-submit type="submit" { "Send Message" }
                            }
                        }
                    }
                }
                footer { (copyright(site)) }
                (script_config(serde_json::json!({
                    "serviceId": config.email.service_id,
                    "contactTemplate": config.email.contact_template,
                    "purchaseTemplate": config.email.purchase_template,
                    "images": details.images,
                })))
                script { (PreEscaped(ARTWORK_JS)) }
            }
        }
    }
}

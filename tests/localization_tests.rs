use agency_api::{
    i18n::{Locale, LocaleSettings, Translations, localized, resolve_field},
    models::{BlogPost, BlogPostTranslation, Service, ServiceTranslation},
};
use chrono::Utc;
use uuid::Uuid;

// --- Fixtures ---

fn service(translations: Option<Translations<ServiceTranslation>>) -> Service {
    let now = Utc::now();
    Service {
        id: Uuid::new_v4(),
        name: "Desarrollo Web".to_string(),
        slug: "desarrollo-web".to_string(),
        description: "Sitios web a medida".to_string(),
        icon: None,
        order: 0,
        is_active: true,
        starting_price: Some(299900),
        translations,
        created_at: now,
        updated_at: now,
    }
}

fn overlay(name: Option<&str>, description: Option<&str>) -> ServiceTranslation {
    ServiceTranslation {
        name: name.map(str::to_string),
        description: description.map(str::to_string),
    }
}

fn post(translations: Option<Translations<BlogPostTranslation>>) -> BlogPost {
    let now = Utc::now();
    BlogPost {
        id: Uuid::new_v4(),
        slug: "hola-mundo".to_string(),
        title: "Hola mundo".to_string(),
        excerpt: None,
        content: "Contenido del artículo".to_string(),
        cover_image: None,
        seo_metadata: None,
        is_published: true,
        published_at: Some(now),
        translations,
        created_at: now,
        updated_at: now,
    }
}

// --- Field resolution ---

#[test]
fn test_no_translations_returns_home_value_for_any_locale() {
    let s = service(None);
    for locale in [Locale::Es, Locale::En] {
        assert_eq!(
            resolve_field(&s, "name", locale, Locale::Es),
            Some("Desarrollo Web")
        );
    }
}

#[test]
fn test_requested_overlay_wins() {
    let s = service(Some(Translations::from([(
        Locale::En,
        overlay(Some("Web Development"), None),
    )])));

    assert_eq!(
        resolve_field(&s, "name", Locale::En, Locale::Es),
        Some("Web Development")
    );
}

#[test]
fn test_missing_requested_overlay_falls_back_to_home_value() {
    // Only an English overlay exists; asking for Spanish with Spanish fallback
    // never touches it.
    let s = service(Some(Translations::from([(
        Locale::En,
        overlay(Some("A"), None),
    )])));

    assert_eq!(
        resolve_field(&s, "name", Locale::Es, Locale::Es),
        Some("Desarrollo Web")
    );
}

#[test]
fn test_fallback_overlay_used_before_home_value() {
    let s = service(Some(Translations::from([
        (Locale::Es, overlay(Some("Desarrollo (es)"), None)),
        (Locale::En, overlay(None, Some("Custom websites"))),
    ])));

    // `name` is missing in the English overlay, so the Spanish overlay answers.
    assert_eq!(
        resolve_field(&s, "name", Locale::En, Locale::Es),
        Some("Desarrollo (es)")
    );
    assert_eq!(
        resolve_field(&s, "description", Locale::En, Locale::Es),
        Some("Custom websites")
    );
}

#[test]
fn test_empty_overlay_value_counts_as_missing() {
    let s = service(Some(Translations::from([(
        Locale::En,
        overlay(Some(""), Some("")),
    )])));

    assert_eq!(
        resolve_field(&s, "name", Locale::En, Locale::Es),
        Some("Desarrollo Web")
    );
}

#[test]
fn test_optional_home_field_without_overlay_is_none() {
    let p = post(None);
    assert_eq!(resolve_field(&p, "excerpt", Locale::En, Locale::Es), None);
}

// --- Whole-item variant ---

#[test]
fn test_localized_copy_resolves_each_field_independently() {
    let s = service(Some(Translations::from([(
        Locale::En,
        overlay(Some("Web Development"), None),
    )])));

    let display = localized(&s, Locale::En, Locale::Es);

    assert_eq!(display.name, "Web Development");
    assert_eq!(display.description, "Sitios web a medida");
    // Non-translatable fields and the overlay map are untouched.
    assert_eq!(display.slug, s.slug);
    assert_eq!(display.starting_price, s.starting_price);
    assert_eq!(display.translations, s.translations);
    // The original is not mutated.
    assert_eq!(s.name, "Desarrollo Web");
}

#[test]
fn test_localized_blog_post_fills_optional_excerpt_from_overlay() {
    let p = post(Some(Translations::from([(
        Locale::En,
        BlogPostTranslation {
            title: Some("Hello world".to_string()),
            excerpt: Some("Short intro".to_string()),
            content: None,
        },
    )])));

    let display = LocaleSettings {
        requested: Locale::En,
        fallback: Locale::Es,
    }
    .apply(&p);

    assert_eq!(display.title, "Hello world");
    assert_eq!(display.excerpt.as_deref(), Some("Short intro"));
    assert_eq!(display.content, "Contenido del artículo");
}

#[test]
fn test_locale_parsing() {
    assert_eq!("es".parse::<Locale>(), Ok(Locale::Es));
    assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
    assert!("fr".parse::<Locale>().is_err());
    assert_eq!(Locale::default(), Locale::Es);
}

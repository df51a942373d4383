use std::fs;
use std::path::PathBuf;

use mapmarkers::loader::load_catalog_file;
use mapmarkers::rendering::{digest, MarkerSink, PageBuilder};
use mapmarkers::{CategoryStyleTable, MapConfig, MarkerCatalogRenderer};
use scraper::{Html, Selector};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens");
    p.push(name);
    p
}

fn demo_config() -> MapConfig {
    MapConfig {
        access_token: "pk.test-token".to_string(),
        ..MapConfig::from_json_file("demos/jobs.config.json").expect("demo config")
    }
}

#[test]
fn golden_instruction_digest_matches() {
    let catalog = load_catalog_file("demos/jobs.geojson").expect("demo catalog");
    let styles = CategoryStyleTable::from_json_file("demos/jobs.styles.json").expect("styles");
    let instructions = MarkerCatalogRenderer::new()
        .render_all(&catalog, &styles)
        .into_strict()
        .expect("demo catalog is valid");
    let actual = digest(&instructions).unwrap();

    let expected_path = golden_path("jobs.instructions.sha256");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens").ok();
        fs::write(&expected_path, format!("{}\n", actual)).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(actual, expected.trim());
}

#[test]
fn demo_page_structure() {
    let catalog = load_catalog_file("demos/jobs.geojson").unwrap();
    let styles = CategoryStyleTable::from_json_file("demos/jobs.styles.json").unwrap();
    let config = demo_config();

    let mut page = PageBuilder::new(config.clone()).unwrap();
    let skipped = config
        .renderer()
        .render_into(&catalog, &styles, &mut page)
        .unwrap();
    assert!(skipped.is_empty());
    let html = page.finish().unwrap();

    let doc = Html::parse_document(&html);
    let title = doc
        .select(&Selector::parse("title").unwrap())
        .next()
        .map(|n| n.text().collect::<String>())
        .unwrap_or_default();
    assert_eq!(title, "Jobs");

    let map = doc.select(&Selector::parse("#map").unwrap()).next().expect("map container");
    assert_eq!(map.value().attr("data-marker-count"), Some("3"));

    let script: String = doc
        .select(&Selector::parse("body script").unwrap())
        .map(|n| n.text().collect::<String>())
        .collect();
    assert!(script.contains("\"pk.test-token\""));
    assert!(script.contains("\"styleClass\":\"pony\""));
    assert!(script.contains("center: [-121.98685827727454,37.360250540945366]"));
    assert!(script.contains("Job number three"));
}

#[test]
fn hostile_description_stays_inside_script() {
    let catalog = mapmarkers::loader::parse_catalog(
        r#"[{"coordinates":[0,0],"properties":{"category":"A","title":"t","description":"</script><p id=\"pwned\">x</p>"}}]"#,
    )
    .unwrap();
    let mut page = PageBuilder::new(demo_config()).unwrap();
    MarkerCatalogRenderer::new()
        .render_into(&catalog, &CategoryStyleTable::new(), &mut page)
        .unwrap();
    let html = page.finish().unwrap();

    let doc = Html::parse_document(&html);
    assert!(doc.select(&Selector::parse("#pwned").unwrap()).next().is_none());
    assert_eq!(doc.select(&Selector::parse("body script").unwrap()).count(), 1);
}

#[test]
fn page_sink_sees_every_valid_marker() {
    let mut page = PageBuilder::new(demo_config()).unwrap();
    let instructions = MarkerCatalogRenderer::new()
        .render_all(
            &load_catalog_file("demos/jobs.geojson").unwrap(),
            &CategoryStyleTable::new(),
        )
        .into_strict()
        .unwrap();
    for i in &instructions {
        page.place_marker(i).unwrap();
    }
    assert_eq!(page.instructions(), instructions.as_slice());
}

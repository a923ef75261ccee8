use super::*;

fn frames(def: &TutorialDef, file: &str) -> u64 {
    let artifact = def
        .artifacts
        .iter()
        .find(|a| a.file == file)
        .unwrap_or_else(|| panic!("{} has no artifact {file}", def.name));
    artifact.steps.iter().map(|s| s.total_frames(def.fps)).sum()
}

#[test]
fn every_preset_validates() {
    let all = all();
    assert_eq!(all.len(), PRESET_NAMES.len());
    for def in &all {
        def.validate()
            .unwrap_or_else(|e| panic!("preset {} is invalid: {e}", def.name));
    }
}

#[test]
fn names_are_unique_and_resolvable() {
    let names: Vec<_> = all().into_iter().map(|d| d.name).collect();
    assert_eq!(names, PRESET_NAMES);
    assert!(by_name("matriz").is_some());
    assert!(by_name("no-such-game").is_none());
}

#[test]
fn presets_survive_a_json_round_trip() {
    for def in all() {
        let json = def.to_json_pretty().unwrap();
        let back = TutorialDef::from_reader(json.as_bytes()).unwrap();
        assert_eq!(back.name, def.name);
        assert_eq!(back.artifacts.len(), def.artifacts.len());
        for (a, b) in back.artifacts.iter().zip(&def.artifacts) {
            assert_eq!(a.file, b.file);
            assert_eq!(frames(&back, &a.file), frames(&def, &b.file));
        }
    }
}

#[test]
fn frame_counts_follow_the_step_plans() {
    let ruta = ruta_luces();
    assert_eq!(frames(&ruta, "tuto1.gif"), 40);
    assert_eq!(frames(&ruta, "tuto3.gif"), 16);
    assert_eq!(ruta.frame_ms(&ruta.artifacts[2]), 60);

    let caja = caja_recuerdos();
    assert_eq!(frames(&caja, "tuto1.gif"), 7);
    assert_eq!(frames(&caja, "tuto3.gif"), 17);

    let matriz = matriz();
    assert_eq!(frames(&matriz, "step1.gif"), 1 + 5 * 16 + 5);
    assert_eq!(frames(&matriz, "step3.gif"), 1 + 5 * 12 + 6);
    assert_eq!(frames(&matriz, "chunking.png"), 1);

    let recuerda = recuerda();
    assert_eq!(recuerda.frame_ms(&recuerda.artifacts[0]), 83);
    assert_eq!(
        recuerda.artifacts[1].encoding.palette,
        PaletteMode::Shared
    );

    let secuencia = secuencia();
    assert_eq!(frames(&secuencia, "step3_chunking.png"), 1);
    assert_eq!(frames(&secuencia, "step3_chunking.gif"), 6 + 3 * 16 + 10);
}

#[test]
fn still_artifacts_are_pngs() {
    let stills: Vec<_> = all()
        .into_iter()
        .flat_map(|d| d.artifacts)
        .filter(|a| a.is_still())
        .map(|a| a.file)
        .collect();
    assert_eq!(stills, ["chunking.png", "step3_chunking.png"]);
}

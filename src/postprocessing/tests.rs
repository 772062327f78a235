use super::*;
use pretty_assertions::assert_eq;

#[test]
fn four_sections_render_in_order() {
    let out = Segmenter::new()
        .render("1. Explicação A 2. Fórmula B 3. =SOMA(A1:A2) 4. Exemplo D");

    assert_eq!(
        out,
        "**1. Explicação técnica breve**\n\nExplicação A\n\n\
         **2. Fórmula matemática clara**\n\nFórmula B\n\n\
         **3. Fórmula Excel aplicável**\n\n=SOMA(A1:A2)\n\n\
         **4. Exemplo numérico completo**\n\nExemplo D"
    );
}

#[test]
fn segment_exposes_ordinals_labels_and_bodies() {
    let sections = Segmenter::new().segment("1. Explicação A 2. Fórmula B 3. =SOMA(A1:A2) 4. Exemplo D");
    let bodies: Vec<_> = sections.iter().map(|s| (s.ordinal, s.body.as_str())).collect();

    assert_eq!(
        bodies,
        vec![
            (1, "Explicação A"),
            (2, "Fórmula B"),
            (3, "=SOMA(A1:A2)"),
            (4, "Exemplo D"),
        ]
    );
    assert_eq!(sections[2].label, "3. Fórmula Excel aplicável");
}

#[test]
fn unrecognized_marker_is_dropped() {
    let out = Segmenter::new().render("5. ignored 1. kept");
    assert_eq!(out, "**1. Explicação técnica breve**\n\nkept");
}

#[test]
fn no_markers_render_empty() {
    assert_eq!(Segmenter::new().render("no markers here"), "");
    assert_eq!(Segmenter::new().render(""), "");
}

#[test]
fn reordered_and_duplicated_markers_keep_source_order() {
    let sections = Segmenter::new().segment("2. b 1. a 2. c");
    let ordinals: Vec<u8> = sections.iter().map(|s| s.ordinal).collect();
    assert_eq!(ordinals, vec![2, 1, 2]);
    assert_eq!(sections[2].body, "c");
}

#[test]
fn marker_with_no_content_renders_empty_body() {
    let out = Segmenter::new().render("1. texto 4.");
    assert_eq!(
        out,
        "**1. Explicação técnica breve**\n\ntexto\n\n**4. Exemplo numérico completo**"
    );
}

#[test]
fn preamble_before_first_marker_is_discarded() {
    let out = Segmenter::new().render("Claro! Veja abaixo:\n1. Área da laje");
    assert_eq!(out, "**1. Explicação técnica breve**\n\nÁrea da laje");
}

struct Upper;

impl SectionRewriter for Upper {
    fn rewrite(&self, body: &str) -> String {
        body.to_uppercase()
    }
}

#[test]
fn formula_rewriter_only_touches_section_three() {
    let segmenter = Segmenter::new().with_formula_rewriter(Box::new(Upper));
    let sections = segmenter.segment("1. soma 3. =soma(b2:c2)");
    assert_eq!(sections[0].body, "soma");
    assert_eq!(sections[1].body, "=SOMA(B2:C2)");
}

#[test]
fn processor_strips_markup_before_segmenting() {
    let raw = "1. Explicação {lixo} 2. Área = \\frac comprimento × largura 3. ```=B2*C2``` 4. 4 × 5 = 20";
    let out = PostProcessor::default().process(raw);

    assert!(!out.contains('{'));
    assert!(!out.contains("lixo"));
    assert!(!out.contains("\\frac"));
    assert_eq!(out.matches("**").count(), 8);
    assert!(out.contains("```=B2*C2```"));
}

#[test]
fn unicode_digit_markers_stay_in_the_body() {
    let out = Segmenter::new().render("1. Área ٢. vezes 2 ２. fim");
    assert_eq!(
        out,
        "**1. Explicação técnica breve**\n\nÁrea ٢. vezes 2 ２. fim"
    );
}

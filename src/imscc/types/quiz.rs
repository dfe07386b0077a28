//! QTI documents (`imsqti_xmlv1pN`), covering both assessments and
//! question banks.
//!
//! Only the parts needed to list and preview questions are mapped: section
//! structure, the question prompt, the choices offered and which choices
//! score.

use super::ContentDocument;
use crate::common::XmlNode;
use serde::Serialize;

/// A decoded `<questestinterop>` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Quiz {
    pub ident: String,
    pub title: String,
    /// `true` for an `<objectbank>` (question bank), `false` for an
    /// `<assessment>`
    pub is_question_bank: bool,
    pub metadata: Vec<MetadataField>,
    pub sections: Vec<Section>,
}

/// A `qtimetadatafield` label/entry pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataField {
    pub label: String,
    pub entry: String,
}

/// A group of questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    pub ident: String,
    pub title: String,
    pub items: Vec<QuizItem>,
}

/// A single question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuizItem {
    pub ident: String,
    pub title: String,
    /// Question profile, e.g. `cc.multiple_choice.v0p1`
    pub question_type: String,
    pub prompt: String,
    pub choices: Vec<Choice>,
    /// Idents of the choices that earn a positive score
    pub correct_responses: Vec<String>,
}

/// An answer option of a choice question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub ident: String,
    pub text: String,
}

impl Quiz {
    /// Number of questions across all sections.
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Look up a metadata entry by label.
    pub fn metadata_entry(&self, label: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.entry.as_str())
    }
}

impl ContentDocument for Quiz {
    const ROOT: &'static str = "questestinterop";

    fn from_node(root: &XmlNode) -> Self {
        if let Some(assessment) = root.child("assessment") {
            let sections = assessment
                .descendants_named("section")
                .into_iter()
                .map(|s| Section {
                    ident: s.attr_or_empty("ident"),
                    title: s.attr_or_empty("title"),
                    items: s.children_named("item").map(parse_item).collect(),
                })
                .collect();

            return Self {
                ident: assessment.attr_or_empty("ident"),
                title: assessment.attr_or_empty("title"),
                is_question_bank: false,
                metadata: metadata_fields(assessment),
                sections,
            };
        }

        if let Some(bank) = root.child("objectbank") {
            let ident = bank.attr_or_empty("ident");
            let metadata = metadata_fields(bank);
            let title = metadata
                .iter()
                .find(|f| f.label == "bank_title")
                .map(|f| f.entry.clone())
                .unwrap_or_default();

            let section = Section {
                ident: ident.clone(),
                title: title.clone(),
                items: bank.descendants_named("item").into_iter().map(parse_item).collect(),
            };

            return Self {
                ident,
                title,
                is_question_bank: true,
                metadata,
                sections: vec![section],
            };
        }

        Self::default()
    }
}

fn metadata_fields(node: &XmlNode) -> Vec<MetadataField> {
    node.child("qtimetadata")
        .map(|m| {
            m.children_named("qtimetadatafield")
                .map(|f| MetadataField {
                    label: f.text_at(&["fieldlabel"]),
                    entry: f.text_at(&["fieldentry"]),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_item(item: &XmlNode) -> QuizItem {
    let metadata = item
        .child("itemmetadata")
        .map(metadata_fields)
        .unwrap_or_default();
    let question_type = metadata
        .iter()
        .find(|f| f.label == "cc_profile" || f.label == "question_type")
        .map(|f| f.entry.clone())
        .unwrap_or_default();

    let presentation = item.child("presentation");
    let prompt = presentation
        .and_then(|p| p.descend(&["material", "mattext"]))
        .map(|m| m.text().to_string())
        .unwrap_or_default();

    let choices = presentation
        .map(|p| {
            p.descendants_named("response_label")
                .into_iter()
                .map(|label| Choice {
                    ident: label.attr_or_empty("ident"),
                    text: label.text_at(&["material", "mattext"]),
                })
                .collect()
        })
        .unwrap_or_default();

    QuizItem {
        ident: item.attr_or_empty("ident"),
        title: item.attr_or_empty("title"),
        question_type,
        prompt,
        choices,
        correct_responses: correct_responses(item),
    }
}

/// Values matched by `respcondition`s that set a positive score.
fn correct_responses(item: &XmlNode) -> Vec<String> {
    let Some(processing) = item.child("resprocessing") else {
        return Vec::new();
    };

    let mut correct = Vec::new();
    for condition in processing.children_named("respcondition") {
        let scores = condition
            .children_named("setvar")
            .any(|s| s.text().parse::<f64>().is_ok_and(|v| v > 0.0));
        if !scores {
            continue;
        }
        if let Some(vars) = condition.child("conditionvar") {
            for value in vars.descendants_named("varequal") {
                let text = value.text().to_string();
                if !text.is_empty() && !correct.contains(&text) {
                    correct.push(text);
                }
            }
        }
    }
    correct
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSESSMENT: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<questestinterop xmlns="http://www.imsglobal.org/xsd/ims_qtiasiv1p2">
  <assessment ident="iad7e264" title="Week 1 Quiz">
    <qtimetadata>
      <qtimetadatafield><fieldlabel>cc_maxattempts</fieldlabel><fieldentry>2</fieldentry></qtimetadatafield>
    </qtimetadata>
    <section ident="root_section">
      <item ident="q1" title="Capital">
        <itemmetadata><qtimetadata>
          <qtimetadatafield><fieldlabel>cc_profile</fieldlabel><fieldentry>cc.multiple_choice.v0p1</fieldentry></qtimetadatafield>
        </qtimetadata></itemmetadata>
        <presentation>
          <material><mattext texttype="text/html">&lt;p&gt;Capital of France?&lt;/p&gt;</mattext></material>
          <response_lid ident="response1" rcardinality="Single">
            <render_choice>
              <response_label ident="a"><material><mattext>Paris</mattext></material></response_label>
              <response_label ident="b"><material><mattext>Lyon</mattext></material></response_label>
            </render_choice>
          </response_lid>
        </presentation>
        <resprocessing>
          <outcomes><decvar varname="SCORE" vartype="Decimal" minvalue="0" maxvalue="100"/></outcomes>
          <respcondition continue="No">
            <conditionvar><varequal respident="response1">a</varequal></conditionvar>
            <setvar varname="SCORE" action="Set">100</setvar>
          </respcondition>
          <respcondition continue="Yes">
            <conditionvar><varequal respident="response1">b</varequal></conditionvar>
            <setvar varname="SCORE" action="Set">0</setvar>
          </respcondition>
        </resprocessing>
      </item>
      <section ident="nested">
        <item ident="q2" title="Essay"><presentation><material><mattext>Discuss.</mattext></material></presentation></item>
      </section>
    </section>
  </assessment>
</questestinterop>"#;

    #[test]
    fn test_decode_assessment() {
        let quiz = Quiz::decode("quiz.xml", ASSESSMENT).unwrap();
        assert_eq!(quiz.ident, "iad7e264");
        assert_eq!(quiz.title, "Week 1 Quiz");
        assert!(!quiz.is_question_bank);
        assert_eq!(quiz.metadata_entry("cc_maxattempts"), Some("2"));
        assert_eq!(quiz.sections.len(), 2);
        assert_eq!(quiz.question_count(), 2);

        let q1 = &quiz.sections[0].items[0];
        assert_eq!(q1.question_type, "cc.multiple_choice.v0p1");
        assert_eq!(q1.prompt, "<p>Capital of France?</p>");
        assert_eq!(q1.choices.len(), 2);
        assert_eq!(q1.choices[0].text, "Paris");
        assert_eq!(q1.correct_responses, vec!["a"]);

        let q2 = &quiz.sections[1].items[0];
        assert_eq!(q2.prompt, "Discuss.");
        assert!(q2.correct_responses.is_empty());
    }

    #[test]
    fn test_decode_question_bank() {
        let xml = br#"<questestinterop><objectbank ident="bank1">
            <qtimetadata><qtimetadatafield><fieldlabel>bank_title</fieldlabel><fieldentry>Pool</fieldentry></qtimetadatafield></qtimetadata>
            <item ident="b1"/><item ident="b2"/>
        </objectbank></questestinterop>"#;
        let quiz = Quiz::decode("bank.xml", xml).unwrap();
        assert!(quiz.is_question_bank);
        assert_eq!(quiz.title, "Pool");
        assert_eq!(quiz.question_count(), 2);
    }

    #[test]
    fn test_empty_questestinterop() {
        let quiz = Quiz::decode("q.xml", b"<questestinterop/>").unwrap();
        assert_eq!(quiz, Quiz::default());
    }
}

//! In-memory cartridge fixtures shared by the unit tests.

use crate::imscc::core::MemoryArchive;
use std::io::{Cursor, Write};

/// Identifier of the web link in [`loaded_course`].
pub const WEBLINK_ID: &str = "ibb3ca45e774c0c487daeb9352e7a4553";
/// A resource of [`loaded_course`] that declares no file at all.
pub const FILELESS_ID: &str = "lti_embedded";
/// Number of catalog resources in [`loaded_course`].
pub const LOADED_COURSE_RESOURCES: usize = 120;

/// Build a ZIP archive from `(name, data)` pairs. Names ending in `/` become
/// directory entries.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Entries of the "Loaded Course" cartridge.
///
/// 120 resources; the organization has two top-level modules holding 11
/// and 1 items. Every structured family is represented, the assignment
/// folder carries an HTML companion listed before the XML, and one LTI
/// resource has no file.
pub fn loaded_course() -> Vec<(String, Vec<u8>)> {
    let mut resources = String::new();
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    resources.push_str(&format!(
        r#"<resource identifier="{id}" type="imswl_xmlv1p1"><file href="{id}.xml"/></resource>"#,
        id = WEBLINK_ID
    ));
    files.push((format!("{}.xml", WEBLINK_ID), WEBLINK.as_bytes().to_vec()));

    resources.push_str(
        r#"<resource identifier="topic_1" type="imsdt_xmlv1p1"><file href="topic_1.xml"/></resource>"#,
    );
    files.push(("topic_1.xml".to_string(), TOPIC.as_bytes().to_vec()));

    resources.push_str(
        r#"<resource identifier="assignment_1" type="assignment_xmlv1p0">
             <file href="assignment_1/description.html"/>
             <file href="assignment_1/assignment.xml"/>
           </resource>"#,
    );
    files.push((
        "assignment_1/description.html".to_string(),
        b"<html><body><p>Write an essay.</p></body></html>".to_vec(),
    ));
    files.push(("assignment_1/assignment.xml".to_string(), ASSIGNMENT.as_bytes().to_vec()));

    resources.push_str(
        r#"<resource identifier="quiz_1" type="imsqti_xmlv1p2/imscc_xmlv1p1/assessment">
             <file href="quiz_1/assessment.xml"/>
           </resource>"#,
    );
    files.push(("quiz_1/assessment.xml".to_string(), QUIZ.as_bytes().to_vec()));

    resources.push_str(
        r#"<resource identifier="lti_1" type="imsbasiclti_xmlv1p0"><file href="lti_1.xml"/></resource>"#,
    );
    files.push(("lti_1.xml".to_string(), LTI.as_bytes().to_vec()));

    resources.push_str(&format!(
        r#"<resource identifier="{}" type="imsbasiclti_xmlv1p0"/>"#,
        FILELESS_ID
    ));

    resources.push_str(
        r#"<resource identifier="web_syllabus" type="webcontent" href="web_resources/syllabus.html">
             <file href="web_resources/syllabus.html"/>
           </resource>"#,
    );
    files.push((
        "web_resources/syllabus.html".to_string(),
        b"<html><body>Syllabus</body></html>".to_vec(),
    ));

    let structured = 7;
    for n in (structured + 1)..=LOADED_COURSE_RESOURCES {
        let href = format!("web_resources/page_{:03}.html", n);
        resources.push_str(&format!(
            r#"<resource identifier="web_{n:03}" type="webcontent" href="{href}"><file href="{href}"/></resource>"#
        ));
        files.push((href, format!("<html><body>Page {}</body></html>", n).into_bytes()));
    }

    let mut module_1 = String::new();
    let refs = [WEBLINK_ID, "topic_1", "assignment_1", "quiz_1", "lti_1", FILELESS_ID, "web_syllabus"];
    for (i, r) in refs.iter().enumerate() {
        module_1.push_str(&format!(
            r#"<item identifier="m1_item_{i}" identifierref="{r}"><title>Item {i}</title></item>"#
        ));
    }
    for n in 8..=11 {
        module_1.push_str(&format!(
            r#"<item identifier="m1_item_{n}" identifierref="web_{n:03}"><title>Page {n}</title></item>"#
        ));
    }

    let manifest = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="loaded_course" xmlns="http://www.imsglobal.org/xsd/imsccv1p1/imscp_v1p1"
          xmlns:lomimscc="http://ltsc.ieee.org/xsd/imsccv1p1/LOM/manifest">
  <metadata>
    <schema>IMS Common Cartridge</schema>
    <schemaversion>1.1.0</schemaversion>
    <lomimscc:lom>
      <lomimscc:general>
        <lomimscc:title><lomimscc:string>Loaded Course</lomimscc:string></lomimscc:title>
        <lomimscc:language>en-US</lomimscc:language>
        <lomimscc:description><lomimscc:string>Sample Description</lomimscc:string></lomimscc:description>
        <lomimscc:keyword><lomimscc:string>Test, Attempt</lomimscc:string></lomimscc:keyword>
      </lomimscc:general>
      <lomimscc:lifeCycle>
        <lomimscc:contribute>
          <lomimscc:date><lomimscc:dateTime>2014-09-08</lomimscc:dateTime></lomimscc:date>
        </lomimscc:contribute>
      </lomimscc:lifeCycle>
      <lomimscc:rights>
        <lomimscc:copyrightAndOtherRestrictions><lomimscc:value>yes</lomimscc:value></lomimscc:copyrightAndOtherRestrictions>
        <lomimscc:description><lomimscc:string>Private (Copyrighted)</lomimscc:string></lomimscc:description>
      </lomimscc:rights>
    </lomimscc:lom>
  </metadata>
  <organizations>
    <organization identifier="org_1" structure="rooted-hierarchy">
      <item identifier="LearningModules">
        <item identifier="module_1"><title>Week 1</title>{module_1}</item>
        <item identifier="module_2"><title>Week 2</title>
          <item identifier="m2_item_1" identifierref="web_012"><title>Page 12</title></item>
        </item>
      </item>
    </organization>
  </organizations>
  <resources>{resources}</resources>
</manifest>"#
    );

    let mut entries = vec![("imsmanifest.xml".to_string(), manifest.into_bytes())];
    entries.extend(files);
    entries
}

/// [`loaded_course`] zipped.
pub fn loaded_course_zip() -> Vec<u8> {
    let entries = loaded_course();
    let borrowed: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(name, data)| (name.as_str(), data.as_slice()))
        .collect();
    zip_bytes(&borrowed)
}

/// [`loaded_course`] as an in-memory archive, optionally nested under a
/// folder.
pub fn loaded_course_archive(prefix: &str) -> MemoryArchive {
    let mut archive = MemoryArchive::new();
    for (name, data) in loaded_course() {
        archive.insert(format!("{}{}", prefix, name), data);
    }
    archive
}

/// Manifest with the given `<resources>` body and a flat organization
/// whose items reference `item_refs` in order.
pub fn manifest_with(resources: &str, item_refs: &[&str]) -> String {
    let items: String = item_refs
        .iter()
        .enumerate()
        .map(|(i, r)| format!(r#"<item identifier="item_{i}" identifierref="{r}"><title>Item {i}</title></item>"#))
        .collect();
    format!(
        r#"<manifest identifier="m"><organizations><organization identifier="org">
             <item identifier="root">{items}</item>
           </organization></organizations><resources>{resources}</resources></manifest>"#
    )
}

pub const WEBLINK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<webLink xmlns="http://www.imsglobal.org/xsd/imsccv1p1/imswl_v1p1">
  <title>Course website</title>
  <url href="https://example.org/course" target="_blank"/>
</webLink>"#;

pub const TOPIC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<topic xmlns="http://www.imsglobal.org/xsd/imsccv1p1/imsdt_v1p1">
  <title>Introductions</title>
  <text texttype="text/html">&lt;p&gt;Say hello.&lt;/p&gt;</text>
</topic>"#;

pub const ASSIGNMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<assignment identifier="assignment_1" xmlns="http://www.imsglobal.org/xsd/imscc_extensions/assignment">
  <title>Essay</title>
  <text texttype="text/html">&lt;p&gt;Write an essay.&lt;/p&gt;</text>
  <gradable points_possible="10">true</gradable>
  <submission_formats><format type="file"/><format type="text"/></submission_formats>
</assignment>"#;

pub const QUIZ: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<questestinterop xmlns="http://www.imsglobal.org/xsd/ims_qtiasiv1p2">
  <assessment ident="quiz_1" title="Week 1 Quiz">
    <section ident="root_section">
      <item ident="q1" title="Capital">
        <itemmetadata><qtimetadata><qtimetadatafield>
          <fieldlabel>cc_profile</fieldlabel><fieldentry>cc.multiple_choice.v0p1</fieldentry>
        </qtimetadatafield></qtimetadata></itemmetadata>
        <presentation>
          <material><mattext texttype="text/plain">Capital of France?</mattext></material>
          <response_lid ident="response1" rcardinality="Single">
            <render_choice>
              <response_label ident="a"><material><mattext>Paris</mattext></material></response_label>
              <response_label ident="b"><material><mattext>Lyon</mattext></material></response_label>
            </render_choice>
          </response_lid>
        </presentation>
        <resprocessing>
          <respcondition continue="No">
            <conditionvar><varequal respident="response1">a</varequal></conditionvar>
            <setvar action="Set" varname="SCORE">100</setvar>
          </respcondition>
        </resprocessing>
      </item>
    </section>
  </assessment>
</questestinterop>"#;

pub const LTI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cartridge_basiclti_link xmlns="http://www.imsglobal.org/xsd/imslticc_v1p0"
    xmlns:blti="http://www.imsglobal.org/xsd/imsbasiclti_v1p0">
  <blti:title>Tool</blti:title>
  <blti:launch_url>https://tool.example.org/launch</blti:launch_url>
  <blti:vendor><lticp:code xmlns:lticp="http://www.imsglobal.org/xsd/imslticp_v1p0">example</lticp:code></blti:vendor>
</cartridge_basiclti_link>"#;

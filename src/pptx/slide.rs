//! Slide part generation: one full-bleed picture plus link overlays.
//!
//! Relationship ids inside a slide are positional: `rId1` is the layout,
//! `rId2` the page picture, and `rId3..` the links in overlay order.

use super::parts::{escape_xml, relationship, relationships, rel_type, SP_TREE_HEADER, NS_A, NS_P, NS_R, XML_DECL};
use super::{LinkOverlay, SlideContent};
use crate::geometry::EmuRect;
use crate::pipeline::links::LinkTarget;
use std::fmt::Write as FmtWrite;

const PICTURE_REL_ID: &str = "rId2";

/// Relationship id of the `i`-th overlay (0-based).
fn link_rel_id(i: usize) -> String {
    format!("rId{}", i + 3)
}

/// Shape ids: 1 is the group, 2 the picture, overlays follow.
fn link_shape_id(i: usize) -> usize {
    i + 3
}

fn write_xfrm(xml: &mut String, rect: &EmuRect) {
    let _ = write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        rect.x, rect.y, rect.width, rect.height
    );
}

fn write_picture(xml: &mut String, slide_number: usize, placement: &EmuRect) {
    xml.push_str("<p:pic>");
    xml.push_str("<p:nvPicPr>");
    let _ = write!(
        xml,
        r#"<p:cNvPr id="2" name="Page {0}" descr="Page {0}"/>"#,
        slide_number
    );
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvPicPr>");

    xml.push_str("<p:blipFill>");
    let _ = write!(xml, r#"<a:blip r:embed="{PICTURE_REL_ID}"/>"#);
    xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
    xml.push_str("</p:blipFill>");

    xml.push_str("<p:spPr>");
    write_xfrm(xml, placement);
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");
    xml.push_str("</p:pic>");
}

fn write_overlay(xml: &mut String, index: usize, overlay: &LinkOverlay) {
    let shape_id = link_shape_id(index);
    let rel_id = link_rel_id(index);

    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    let _ = write!(
        xml,
        r#"<p:cNvPr id="{}" name="Link {}" descr="{}">"#,
        shape_id,
        index + 1,
        escape_xml(&overlay.target.to_string())
    );
    match overlay.target {
        LinkTarget::Uri(_) => {
            let _ = write!(xml, r#"<a:hlinkClick r:id="{rel_id}"/>"#);
        }
        LinkTarget::Page(_) => {
            let _ = write!(
                xml,
                r#"<a:hlinkClick r:id="{rel_id}" action="ppaction://hlinksldjump"/>"#
            );
        }
    }
    xml.push_str("</p:cNvPr>");
    xml.push_str("<p:cNvSpPr/>");
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvSpPr>");

    xml.push_str("<p:spPr>");
    write_xfrm(xml, &overlay.rect);
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    // fully transparent but still filled, so the whole area takes clicks
    xml.push_str(r#"<a:solidFill><a:srgbClr val="FFFFFF"><a:alpha val="0"/></a:srgbClr></a:solidFill>"#);
    xml.push_str("<a:ln><a:noFill/></a:ln>");
    xml.push_str("</p:spPr>");
    xml.push_str("</p:sp>");
}

/// `ppt/slides/slide{slide_number}.xml`.
pub(crate) fn slide_xml(slide_number: usize, content: &SlideContent) -> String {
    let mut xml = String::with_capacity(1024 + content.links.len() * 640);
    xml.push_str(XML_DECL);
    let _ = write!(
        xml,
        r#"<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#
    );
    xml.push_str("<p:cSld>");
    xml.push_str("<p:spTree>");
    xml.push_str(SP_TREE_HEADER);

    write_picture(&mut xml, slide_number, &content.placement);
    for (i, overlay) in content.links.iter().enumerate() {
        write_overlay(&mut xml, i, overlay);
    }

    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

/// `ppt/slides/_rels/slide{n}.xml.rels`. `media_name` is the file name of
/// the picture under `ppt/media/`.
pub(crate) fn slide_rels_xml(content: &SlideContent, media_name: &str) -> String {
    let mut body = String::with_capacity(512 + content.links.len() * 200);
    relationship(
        &mut body,
        "rId1",
        rel_type::SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
        false,
    );
    relationship(
        &mut body,
        PICTURE_REL_ID,
        rel_type::IMAGE,
        &format!("../media/{media_name}"),
        false,
    );
    for (i, overlay) in content.links.iter().enumerate() {
        match &overlay.target {
            LinkTarget::Uri(uri) => {
                relationship(&mut body, &link_rel_id(i), rel_type::HYPERLINK, uri, true)
            }
            LinkTarget::Page(page) => relationship(
                &mut body,
                &link_rel_id(i),
                rel_type::SLIDE,
                &format!("slide{}.xml", page + 1),
                false,
            ),
        }
    }
    relationships(&body)
}

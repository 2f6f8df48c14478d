//! Identification reports.
//!
//! Every identify pick produces a block of text describing the picked
//! entity. Which sections and sub-sections appear is controlled by the
//! [`IdFilter`] flag set; floats render with a configurable number of
//! significant digits, and vocabulary terms in free text become hyperlinks
//! to the vocabulary panel.

use crate::config::DEFAULT_SIGNIFICANT_DIGITS;
use crate::model::{BrainSet, StudyInfo};
use crate::selection::{SelectedItem, SelectedKind, VoxelHit};

/// Node report sub-sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdNodeFilter {
    /// Node coordinates.
    pub coord: bool,
    /// Latitude/longitude.
    pub lat_lon: bool,
    /// Paint names.
    pub paint: bool,
    /// Probabilistic atlas label.
    pub prob_atlas: bool,
    /// RGB paint.
    pub rgb: bool,
    /// Metric value.
    pub metric: bool,
    /// Surface shape value.
    pub shape: bool,
    /// Section number.
    pub section: bool,
    /// Areal estimation label.
    pub areal_est: bool,
    /// Topography label.
    pub topography: bool,
}

/// Focus report sub-sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdFocusFilter {
    /// Stereotaxic position.
    pub position: bool,
    /// Original (pre-projection) stereotaxic position.
    pub original_position: bool,
    /// Anatomical area.
    pub area: bool,
    /// Geographic description.
    pub geography: bool,
    /// Extent.
    pub size: bool,
    /// Reported statistic.
    pub statistic: bool,
    /// Free-form comment.
    pub comment: bool,
    /// Class name.
    pub class_name: bool,
}

/// Study report sub-sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdStudyFilter {
    /// Title.
    pub title: bool,
    /// Authors.
    pub authors: bool,
    /// Citation.
    pub citation: bool,
    /// Comment.
    pub comment: bool,
    /// DOI.
    pub doi: bool,
    /// URL.
    pub url: bool,
    /// Keywords.
    pub keywords: bool,
    /// Medical subject headings.
    pub medical_subject_headings: bool,
    /// Data format.
    pub data_format: bool,
    /// Data type.
    pub data_type: bool,
    /// PubMed identifier.
    pub pubmed_id: bool,
    /// Project identifier.
    pub project_id: bool,
    /// Partitioning-scheme abbreviation.
    pub part_scheme_abbrev: bool,
    /// Partitioning-scheme full name.
    pub part_scheme_full: bool,
    /// Stereotaxic space.
    pub stereotaxic_space: bool,
    /// Stereotaxic space details.
    pub stereotaxic_space_details: bool,
    /// Meta-analysis section.
    pub meta_analysis: bool,
    /// Meta-analysis name.
    pub meta_analysis_name: bool,
    /// Meta-analysis title.
    pub meta_analysis_title: bool,
    /// Meta-analysis authors.
    pub meta_analysis_authors: bool,
    /// Meta-analysis citation.
    pub meta_analysis_citation: bool,
    /// Meta-analysis DOI or URL.
    pub meta_analysis_doi_url: bool,
    /// Tables section.
    pub tables: bool,
    /// Table header.
    pub table_header: bool,
    /// Table footer.
    pub table_footer: bool,
    /// Table size units.
    pub table_size_units: bool,
    /// Table voxel size.
    pub table_voxel_size: bool,
    /// Table statistic.
    pub table_statistic: bool,
    /// Table statistic description.
    pub table_statistic_description: bool,
    /// Table sub-headers.
    pub table_sub_headers: bool,
    /// Figures section.
    pub figures: bool,
    /// Figure legend.
    pub figure_legend: bool,
    /// Figure panels.
    pub figure_panels: bool,
    /// Panel description.
    pub figure_panel_description: bool,
    /// Panel task description.
    pub figure_panel_task_description: bool,
    /// Panel task baseline.
    pub figure_panel_task_baseline: bool,
    /// Panel test attributes.
    pub figure_panel_test_attributes: bool,
    /// Page-references section.
    pub page_references: bool,
    /// Page-reference header.
    pub page_reference_header: bool,
    /// Page-reference comment.
    pub page_reference_comment: bool,
    /// Page-reference size units.
    pub page_reference_size_units: bool,
    /// Page-reference voxel size.
    pub page_reference_voxel_size: bool,
    /// Page-reference statistic.
    pub page_reference_statistic: bool,
    /// Page-reference statistic description.
    pub page_reference_statistic_description: bool,
    /// Page number within the publication.
    pub page_number: bool,
}

/// The full identification flag set.
///
/// `display_id_symbol` controls the green ID marker drawn at the picked
/// position; it is excluded from [`toggle_all`](IdFilter::toggle_all) so
/// turning the report off does not also hide the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdFilter {
    /// Draw the ID marker symbol at picked positions.
    pub display_id_symbol: bool,
    /// Node section.
    pub node: bool,
    /// Node sub-sections.
    pub node_detail: IdNodeFilter,
    /// Border section.
    pub border: bool,
    /// Cell section.
    pub cell: bool,
    /// Voxel section.
    pub voxel: bool,
    /// Contour section.
    pub contour: bool,
    /// Contour-cell section.
    pub contour_cell: bool,
    /// Focus section.
    pub focus: bool,
    /// Focus sub-sections.
    pub focus_detail: IdFocusFilter,
    /// Study section.
    pub study: bool,
    /// Study sub-sections.
    pub study_detail: IdStudyFilter,
}

macro_rules! all_fields {
    ($on:expr; $($field:ident),+ $(,)?) => {
        Self { $($field: $on),+ }
    };
}

impl IdNodeFilter {
    /// Every flag set to `on`.
    pub fn filled(on: bool) -> Self {
        all_fields!(on; coord, lat_lon, paint, prob_atlas, rgb, metric, shape,
            section, areal_est, topography)
    }

    fn any(&self) -> bool {
        *self != Self::filled(false)
    }
}

impl IdFocusFilter {
    /// Every flag set to `on`.
    pub fn filled(on: bool) -> Self {
        all_fields!(on; position, original_position, area, geography, size,
            statistic, comment, class_name)
    }

    fn any(&self) -> bool {
        *self != Self::filled(false)
    }
}

impl IdStudyFilter {
    /// Every flag set to `on`.
    pub fn filled(on: bool) -> Self {
        all_fields!(on; title, authors, citation, comment, doi, url, keywords,
            medical_subject_headings, data_format, data_type, pubmed_id,
            project_id, part_scheme_abbrev, part_scheme_full,
            stereotaxic_space, stereotaxic_space_details, meta_analysis,
            meta_analysis_name, meta_analysis_title, meta_analysis_authors,
            meta_analysis_citation, meta_analysis_doi_url, tables,
            table_header, table_footer, table_size_units, table_voxel_size,
            table_statistic, table_statistic_description, table_sub_headers,
            figures, figure_legend, figure_panels, figure_panel_description,
            figure_panel_task_description, figure_panel_task_baseline,
            figure_panel_test_attributes, page_references,
            page_reference_header, page_reference_comment,
            page_reference_size_units, page_reference_voxel_size,
            page_reference_statistic, page_reference_statistic_description,
            page_number)
    }

    fn any(&self) -> bool {
        *self != Self::filled(false)
    }
}

impl Default for IdFilter {
    fn default() -> Self {
        Self::filled(true)
    }
}

impl IdFilter {
    /// Every flag (including the ID-symbol flag) set to `on`.
    pub fn filled(on: bool) -> Self {
        Self {
            display_id_symbol: on,
            node: on,
            node_detail: IdNodeFilter::filled(on),
            border: on,
            cell: on,
            voxel: on,
            contour: on,
            contour_cell: on,
            focus: on,
            focus_detail: IdFocusFilter::filled(on),
            study: on,
            study_detail: IdStudyFilter::filled(on),
        }
    }

    /// Whether any report flag is on (the ID-symbol flag does not count).
    pub fn any_on(&self) -> bool {
        self.node
            || self.border
            || self.cell
            || self.voxel
            || self.contour
            || self.contour_cell
            || self.focus
            || self.study
            || self.node_detail.any()
            || self.focus_detail.any()
            || self.study_detail.any()
    }

    /// If any report flag is on, turn all off; otherwise turn all on. The
    /// ID-symbol flag is left alone.
    pub fn toggle_all(&mut self) {
        let symbol = self.display_id_symbol;
        *self = Self::filled(!self.any_on());
        self.display_id_symbol = symbol;
    }
}

/// Composes identification text for picked items.
#[derive(Debug, Clone)]
pub struct IdentificationAssembler {
    /// Section gating flags.
    pub filter: IdFilter,
    /// Significant digits for floats.
    pub significant_digits: usize,
}

impl Default for IdentificationAssembler {
    fn default() -> Self {
        Self {
            filter: IdFilter::default(),
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
        }
    }
}

impl IdentificationAssembler {
    /// Report text for one picked item, with vocabulary links applied.
    /// Returns an empty string when the relevant section is filtered off.
    pub fn assemble(&self, set: &BrainSet, model_index: usize, item: &SelectedItem) -> String {
        let mut out = String::new();
        match &item.kind {
            SelectedKind::Node { node } => self.node_text(&mut out, set, model_index, *node),
            SelectedKind::SurfaceTile { tile } => {
                push_line(&mut out, format!("Tile {tile}"));
            }
            SelectedKind::BorderPoint { border, link, .. } => {
                self.border_text(&mut out, set.border_set.get(*border), *border, *link);
            }
            SelectedKind::VolumeBorderPoint { border, link } => {
                self.border_text(&mut out, set.volume_borders.get(*border), *border, *link);
            }
            SelectedKind::Cut { cut, link } => {
                if let Some(b) = set.cuts.get(*cut) {
                    push_line(&mut out, format!("Cut {} link {link}", b.name));
                }
            }
            SelectedKind::Cell { cell } => self.cell_text(&mut out, set, &set.cells, *cell, "Cell"),
            SelectedKind::VolumeCell { cell } => {
                self.cell_text(&mut out, set, &set.volume_cells, *cell, "Volume Cell");
            }
            SelectedKind::TransformCell { cell } => {
                self.cell_text(&mut out, set, &set.cells, *cell, "Transform Cell");
            }
            SelectedKind::ContourCell { cell } => {
                if self.filter.contour_cell
                    && let Some(c) = set.contour_cells.cells.get(*cell)
                {
                    push_line(
                        &mut out,
                        format!(
                            "Contour Cell {}: {} section {}",
                            c.name,
                            self.xyz(c.xyz),
                            c.section
                        ),
                    );
                }
            }
            SelectedKind::FocusProjection { focus } => {
                self.focus_text(&mut out, set, &set.foci.foci, *focus);
            }
            SelectedKind::VolumeFocus { focus } | SelectedKind::TransformFocus { focus } => {
                self.focus_text(&mut out, set, &set.volume_foci.foci, *focus);
            }
            SelectedKind::ContourPoint { contour, point } => {
                if self.filter.contour
                    && let Some(m) = set.model(model_index).and_then(|m| m.as_contours())
                    && let Some(c) = m.contours.contours.get(*contour)
                {
                    let pos = c.points.get(*point).copied().unwrap_or_default();
                    push_line(
                        &mut out,
                        format!(
                            "Contour {contour} section {} point {point}: {}",
                            c.section,
                            self.xyz(pos)
                        ),
                    );
                }
            }
            SelectedKind::VoxelUnderlay(hit)
            | SelectedKind::VoxelOverlaySecondary(hit)
            | SelectedKind::VoxelOverlayPrimary(hit)
            | SelectedKind::VoxelFunctionalCloud(hit) => self.voxel_text(&mut out, set, hit),
            SelectedKind::Link { node_a, node_b } => {
                push_line(&mut out, format!("Link {node_a}-{node_b}"));
            }
            SelectedKind::TransformationAxes { matrix } => {
                if let Some(m) = set.transform_file.get(*matrix) {
                    push_line(&mut out, format!("Transformation Axes {}", m.name));
                }
            }
            SelectedKind::VtkModel { model, tile } => {
                push_line(&mut out, format!("VTK Model {model} tile {tile}"));
            }
            SelectedKind::PaletteMetric { entry } => {
                push_line(&mut out, format!("Metric Palette entry {entry}"));
            }
            SelectedKind::PaletteShape { entry } => {
                push_line(&mut out, format!("Shape Palette entry {entry}"));
            }
        }
        link_vocabulary(&out, &set.vocabulary)
    }

    fn xyz(&self, p: [f64; 3]) -> String {
        let d = self.significant_digits;
        format!("({}, {}, {})", sig(p[0], d), sig(p[1], d), sig(p[2], d))
    }

    fn node_text(&self, out: &mut String, set: &BrainSet, model_index: usize, node: usize) {
        if !self.filter.node {
            return;
        }
        let f = &self.filter.node_detail;
        let a = &set.node_attributes;
        push_line(out, format!("Node {node}"));
        if f.coord
            && let Some(s) = set.model(model_index).and_then(|m| m.as_surface())
            && let Some(&c) = s.coords.get(node)
        {
            push_line(out, format!("  Position: {}", self.xyz(c)));
        }
        if f.lat_lon && let Some(ll) = a.lat_lon.get(node) {
            let d = self.significant_digits;
            push_line(
                out,
                format!("  Lat/Lon: ({}, {})", sig(ll[0], d), sig(ll[1], d)),
            );
        }
        if f.paint && let Some(p) = a.paint.get(node) {
            push_line(out, format!("  Paint: {p}"));
        }
        if f.prob_atlas && let Some(p) = a.prob_atlas.get(node) {
            push_line(out, format!("  Prob Atlas: {p}"));
        }
        if f.rgb && let Some(c) = a.rgb.get(node) {
            push_line(out, format!("  RGB: {}", self.xyz(*c)));
        }
        if f.metric && let Some(v) = a.metric.get(node) {
            push_line(out, format!("  Metric: {}", sig(*v, self.significant_digits)));
        }
        if f.shape && let Some(v) = a.shape.get(node) {
            push_line(out, format!("  Shape: {}", sig(*v, self.significant_digits)));
        }
        if f.section && let Some(s) = a.section.get(node) {
            push_line(out, format!("  Section: {s}"));
        }
        if f.areal_est && let Some(s) = a.areal_est.get(node) {
            push_line(out, format!("  Areal Estimation: {s}"));
        }
        if f.topography && let Some(s) = a.topography.get(node) {
            push_line(out, format!("  Topography: {s}"));
        }
    }

    fn border_text(
        &self,
        out: &mut String,
        border: Option<&crate::model::Border>,
        index: usize,
        link: usize,
    ) {
        if !self.filter.border {
            return;
        }
        if let Some(b) = border {
            push_line(out, format!("Border {index} ({}) link {link}", b.name));
            if let Some(&p) = b.points.get(link) {
                push_line(out, format!("  Position: {}", self.xyz(p)));
            }
        }
    }

    fn cell_text(
        &self,
        out: &mut String,
        set: &BrainSet,
        file: &crate::model::CellFile,
        index: usize,
        label: &str,
    ) {
        if !self.filter.cell {
            return;
        }
        if let Some(c) = file.cells.get(index) {
            push_line(out, format!("{label} {}: {}", c.name, self.xyz(c.xyz)));
            if let Some(n) = c.node {
                push_line(out, format!("  Node: {n}"));
            }
            if self.filter.study && let Some(s) = c.study.and_then(|i| set.studies.get(i)) {
                self.study_text(out, s);
            }
        }
    }

    fn focus_text(&self, out: &mut String, set: &BrainSet, foci: &[crate::model::Focus], index: usize) {
        if !self.filter.focus {
            return;
        }
        let Some(focus) = foci.get(index) else {
            return;
        };
        let f = &self.filter.focus_detail;
        push_line(out, format!("Focus {}", focus.name));
        if f.position {
            push_line(out, format!("  Position: {}", self.xyz(focus.xyz)));
        }
        if f.original_position {
            push_line(
                out,
                format!("  Original Position: {}", self.xyz(focus.original_xyz)),
            );
        }
        if f.area && !focus.area.is_empty() {
            push_line(out, format!("  Area: {}", focus.area));
        }
        if f.geography && !focus.geography.is_empty() {
            push_line(out, format!("  Geography: {}", focus.geography));
        }
        if f.size {
            push_line(
                out,
                format!("  Size: {}", sig(focus.size, self.significant_digits)),
            );
        }
        if f.statistic && !focus.statistic.is_empty() {
            push_line(out, format!("  Statistic: {}", focus.statistic));
        }
        if f.comment && !focus.comment.is_empty() {
            push_line(out, format!("  Comment: {}", focus.comment));
        }
        if f.class_name && !focus.class_name.is_empty() {
            push_line(out, format!("  Class: {}", focus.class_name));
        }
        if self.filter.study && let Some(s) = focus.study.and_then(|i| set.studies.get(i)) {
            self.study_text(out, s);
        }
    }

    fn voxel_text(&self, out: &mut String, set: &BrainSet, hit: &VoxelHit) {
        if !self.filter.voxel {
            return;
        }
        let [i, j, k] = hit.ijk;
        push_line(out, format!("Voxel ({i}, {j}, {k})"));
        // Every displayed volume reports the world position of the voxel.
        for model in &set.models {
            if let Some(v) = model.as_volume() {
                let p = [
                    v.slice_coordinate(0, i),
                    v.slice_coordinate(1, j),
                    v.slice_coordinate(2, k),
                ];
                push_line(out, format!("  Position: {}", self.xyz(p)));
                break;
            }
        }
    }

    fn study_text(&self, out: &mut String, s: &StudyInfo) {
        let f = &self.filter.study_detail;
        push_line(out, format!("Study {}", s.name));
        let simple: [(bool, &str, &str); 16] = [
            (f.title, "Title", &s.title),
            (f.authors, "Authors", &s.authors),
            (f.citation, "Citation", &s.citation),
            (f.comment, "Comment", &s.comment),
            (f.doi, "DOI", &s.doi),
            (f.url, "URL", &s.url),
            (f.data_format, "Data Format", &s.data_format),
            (f.data_type, "Data Type", &s.data_type),
            (f.pubmed_id, "PubMed ID", &s.pubmed_id),
            (f.project_id, "Project ID", &s.project_id),
            (f.part_scheme_abbrev, "Partitioning Scheme", &s.part_scheme_abbrev),
            (f.part_scheme_full, "Partitioning Scheme Full Name", &s.part_scheme_full),
            (f.stereotaxic_space, "Stereotaxic Space", &s.stereotaxic_space),
            (
                f.stereotaxic_space_details,
                "Stereotaxic Space Details",
                &s.stereotaxic_space_details,
            ),
            (f.page_number, "Page Number", &s.page_number),
            (f.keywords, "Keywords", ""),
        ];
        for (on, label, value) in &simple[..15] {
            if *on && !value.is_empty() {
                push_line(out, format!("  {label}: {value}"));
            }
        }
        if f.keywords && !s.keywords.is_empty() {
            push_line(out, format!("  Keywords: {}", s.keywords.join(", ")));
        }
        if f.medical_subject_headings && !s.medical_subject_headings.is_empty() {
            push_line(
                out,
                format!("  MeSH: {}", s.medical_subject_headings.join(", ")),
            );
        }
        if f.meta_analysis && let Some(m) = &s.meta_analysis {
            push_line(out, "  Meta-Analysis".to_string());
            let parts: [(bool, &str, &str); 5] = [
                (f.meta_analysis_name, "Name", &m.name),
                (f.meta_analysis_title, "Title", &m.title),
                (f.meta_analysis_authors, "Authors", &m.authors),
                (f.meta_analysis_citation, "Citation", &m.citation),
                (f.meta_analysis_doi_url, "DOI/URL", &m.doi_url),
            ];
            for (on, label, value) in parts {
                if on && !value.is_empty() {
                    push_line(out, format!("    {label}: {value}"));
                }
            }
        }
        if f.tables {
            for t in &s.tables {
                push_line(out, format!("  Table {}", t.number));
                let parts: [(bool, &str, &str); 6] = [
                    (f.table_header, "Header", &t.header),
                    (f.table_footer, "Footer", &t.footer),
                    (f.table_size_units, "Size Units", &t.size_units),
                    (f.table_voxel_size, "Voxel Size", &t.voxel_size),
                    (f.table_statistic, "Statistic", &t.statistic),
                    (
                        f.table_statistic_description,
                        "Statistic Description",
                        &t.statistic_description,
                    ),
                ];
                for (on, label, value) in parts {
                    if on && !value.is_empty() {
                        push_line(out, format!("    {label}: {value}"));
                    }
                }
                if f.table_sub_headers {
                    for h in &t.sub_headers {
                        push_line(out, format!("    Sub-Header: {h}"));
                    }
                }
            }
        }
        if f.figures {
            for fig in &s.figures {
                push_line(out, format!("  Figure {}", fig.number));
                if f.figure_legend && !fig.legend.is_empty() {
                    push_line(out, format!("    Legend: {}", fig.legend));
                }
                if f.figure_panels {
                    for p in &fig.panels {
                        push_line(out, format!("    Panel {}", p.identifier));
                        let parts: [(bool, &str, &str); 4] = [
                            (f.figure_panel_description, "Description", &p.description),
                            (
                                f.figure_panel_task_description,
                                "Task Description",
                                &p.task_description,
                            ),
                            (f.figure_panel_task_baseline, "Task Baseline", &p.task_baseline),
                            (
                                f.figure_panel_test_attributes,
                                "Test Attributes",
                                &p.test_attributes,
                            ),
                        ];
                        for (on, label, value) in parts {
                            if on && !value.is_empty() {
                                push_line(out, format!("      {label}: {value}"));
                            }
                        }
                    }
                }
            }
        }
        if f.page_references {
            for r in &s.page_references {
                push_line(out, format!("  Page Reference {}", r.page_number));
                let parts: [(bool, &str, &str); 6] = [
                    (f.page_reference_header, "Header", &r.header),
                    (f.page_reference_comment, "Comment", &r.comment),
                    (f.page_reference_size_units, "Size Units", &r.size_units),
                    (f.page_reference_voxel_size, "Voxel Size", &r.voxel_size),
                    (f.page_reference_statistic, "Statistic", &r.statistic),
                    (
                        f.page_reference_statistic_description,
                        "Statistic Description",
                        &r.statistic_description,
                    ),
                ];
                for (on, label, value) in parts {
                    if on && !value.is_empty() {
                        push_line(out, format!("    {label}: {value}"));
                    }
                }
            }
        }
    }
}

fn push_line(out: &mut String, line: String) {
    out.push_str(&line);
    out.push('\n');
}

/// Format `v` with `digits` significant digits, the `%g` convention: fixed
/// notation with trailing zeros trimmed when the exponent is moderate,
/// scientific otherwise.
pub fn sig(v: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if v == 0.0 {
        return "0".to_string();
    }
    if !v.is_finite() {
        return format!("{v}");
    }
    let exp = v.abs().log10().floor() as i32;
    if exp < -4 || exp >= digits as i32 {
        format!("{:.*e}", digits - 1, v)
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        let s = format!("{v:.decimals$}");
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    }
}

/// Replace whole-word vocabulary matches with hyperlinks to the vocabulary
/// panel.
fn link_vocabulary(text: &str, vocabulary: &[String]) -> String {
    if vocabulary.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    let flush = |out: &mut String, word: &mut String| {
        if !word.is_empty() {
            if vocabulary.iter().any(|v| v == word) {
                out.push_str(&format!("<a href=\"vocabulary://{word}\">{word}</a>"));
            } else {
                out.push_str(word);
            }
            word.clear();
        }
    };
    for c in text.chars() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            word.push(c);
        } else {
            flush(&mut out, &mut word);
            out.push(c);
        }
    }
    flush(&mut out, &mut word);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BrainModel, SurfaceModel, SurfaceType};

    #[test]
    fn toggle_all_flips_between_extremes() {
        let mut f = IdFilter::default();
        f.display_id_symbol = true;
        assert!(f.any_on());
        f.toggle_all();
        assert!(!f.any_on());
        assert!(f.display_id_symbol);
        f.toggle_all();
        assert!(f.any_on());
        assert_eq!(f.node_detail, IdNodeFilter::filled(true));
        assert_eq!(f.study_detail, IdStudyFilter::filled(true));
    }

    #[test]
    fn toggle_all_from_partial_state_turns_off() {
        let mut f = IdFilter::filled(false);
        f.focus = true;
        f.toggle_all();
        assert!(!f.any_on());
    }

    #[test]
    fn sig_matches_g_conversion() {
        assert_eq!(sig(1234.5678, 6), "1234.57");
        assert_eq!(sig(0.000123, 6), "0.000123");
        assert_eq!(sig(-2.5, 6), "-2.5");
        assert_eq!(sig(0.0, 6), "0");
        assert_eq!(sig(100.0, 3), "100");
        assert_eq!(sig(15000000000.0, 3), "1.50e10");
    }

    #[test]
    fn node_report_respects_sub_flags() {
        let mut set = BrainSet::default();
        let mut surface = SurfaceModel::new(SurfaceType::Fiducial);
        surface.add_node([1.0, 2.0, 3.0]);
        let idx = set.add_model(BrainModel::Surface(surface));
        set.node_attributes.paint.push("SUL.CeS".to_string());
        set.node_attributes.metric.push(0.75);

        let mut assembler = IdentificationAssembler::default();
        assembler.filter.node_detail.metric = false;
        let item = SelectedItem::new(SelectedKind::Node { node: 0 }, 0.0);
        let text = assembler.assemble(&set, idx, &item);
        assert!(text.contains("Node 0"));
        assert!(text.contains("Position: (1, 2, 3)"));
        assert!(text.contains("Paint"));
        assert!(!text.contains("Metric"));
    }

    #[test]
    fn filtered_off_section_yields_empty_report() {
        let set = BrainSet::default();
        let mut assembler = IdentificationAssembler::default();
        assembler.filter.node = false;
        let item = SelectedItem::new(SelectedKind::Node { node: 3 }, 0.0);
        assert!(assembler.assemble(&set, 0, &item).is_empty());
    }

    #[test]
    fn vocabulary_terms_become_links() {
        let vocab = vec!["CeS".to_string()];
        let linked = link_vocabulary("Paint: CeS region (CeSx stays)", &vocab);
        assert!(linked.contains("<a href=\"vocabulary://CeS\">CeS</a>"));
        assert!(linked.contains("CeSx stays"));
    }

    #[test]
    fn focus_report_includes_study_metadata() {
        let mut set = BrainSet::default();
        set.studies.push(StudyInfo {
            name: "S1".to_string(),
            title: "Mapping the central sulcus".to_string(),
            ..StudyInfo::default()
        });
        set.volume_foci.foci.push(crate::model::Focus {
            name: "F1".to_string(),
            xyz: [10.0, -20.0, 30.0],
            study: Some(0),
            ..crate::model::Focus::default()
        });
        let assembler = IdentificationAssembler::default();
        let item = SelectedItem::new(SelectedKind::VolumeFocus { focus: 0 }, 0.0);
        let text = assembler.assemble(&set, 0, &item);
        assert!(text.contains("Focus F1"));
        assert!(text.contains("Position: (10, -20, 30)"));
        assert!(text.contains("Study S1"));
        assert!(text.contains("Title: Mapping the central sulcus"));
    }
}

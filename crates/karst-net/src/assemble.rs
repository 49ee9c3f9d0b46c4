// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The network assembler.
//!
//! Unifies stations and shots across the files of a project. Station names
//! are file-local unless declared as links: a name that collides with an
//! earlier file and is not a link of its file entry is qualified with the
//! file stem (`stem:name`), so only declared links bridge files.
//!
//! Fixed stations are materialised last, overriding any computed position
//! and marking the station as an anchor whose origin is itself.

use crate::delta::shot_delta;
use crate::network::{NetworkBuilder, SurveyNetwork};
use karst_core::math::vec3::Vector3D;
use karst_core::units::feet_from_meters;
use karst_model::diag::{DiagnosticKind, Diagnostics};
use karst_model::geomag::GeomagneticModel;
use karst_model::project::{DeclinationMode, FileEntry, Project};
use karst_model::survey::{ShotFlags, Survey};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Assembles the survey network of a project.
///
/// `surveys_by_file` maps each file entry's path (as written in the
/// project) to its parsed surveys; entries without data are skipped with a
/// warning. `geomag` backs the automatic-declination policy; without a
/// model the entered declination is used.
pub fn assemble(
    project: &Project,
    surveys_by_file: &HashMap<String, Vec<Survey>>,
    geomag: Option<&dyn GeomagneticModel>,
    diag: &mut Diagnostics,
) -> SurveyNetwork {
    let mut builder = NetworkBuilder::new();
    let convergence = project.effective_convergence();

    for entry in &project.files {
        let Some(surveys) = surveys_by_file.get(&entry.path) else {
            warn!(file = %entry.path, "no survey data supplied for project file");
            continue;
        };

        let mut renames: HashMap<String, String> = HashMap::new();
        for survey in surveys {
            let declination = effective_declination(project, survey, geomag);
            add_survey(
                &mut builder,
                entry,
                survey,
                declination,
                convergence,
                project,
                &mut renames,
                diag,
            );
        }
    }

    // Fixed stations override computed data and become anchors. Their
    // names are links by definition and are never qualified.
    for entry in &project.files {
        for fixed in &entry.fixed {
            let index = builder.intern(&fixed.name);
            builder.set_fixed(index, fixed.position_feet());
            debug!(station = %fixed.name, "fixed station materialised");
        }
    }

    if let Some(base) = project.base {
        builder.set_fallback_origin(Vector3D::new(
            feet_from_meters(base.east),
            feet_from_meters(base.north),
            feet_from_meters(base.elevation),
        ));
    }

    let network = builder.build();
    info!(
        stations = network.station_count(),
        shots = network.shots().len(),
        anchors = network.anchors().len(),
        surveyed_feet = network.surveyed_length(),
        "network assembled"
    );
    network
}

#[allow(clippy::too_many_arguments)]
fn add_survey(
    builder: &mut NetworkBuilder,
    entry: &FileEntry,
    survey: &Survey,
    declination: f64,
    convergence: Option<f64>,
    project: &Project,
    renames: &mut HashMap<String, String>,
    diag: &mut Diagnostics,
) {
    let flags = &project.flags;

    for shot in &survey.shots {
        if shot.flags.exclude_all && flags.honours_exclude_all() {
            continue;
        }

        let Some(vector) = shot_delta(survey, shot, declination, convergence, &entry.path, diag)
        else {
            continue;
        };

        let from = resolve_name(builder, entry, renames, &shot.from, diag);
        let to = resolve_name(builder, entry, renames, &shot.to, diag);
        let from = builder.intern(&from);
        let to = builder.intern(&to);

        let effective = ShotFlags {
            exclude_length: shot.flags.exclude_length && flags.honours_exclude_length(),
            exclude_plot: shot.flags.exclude_plot && flags.honours_exclude_plot(),
            exclude_all: false,
            no_adjust: shot.flags.no_adjust && flags.honours_no_adjust(),
        };
        builder.add_shot(from, to, vector.delta, vector.length, effective);
    }
}

/// Maps a file-local station name into the global namespace.
///
/// Declared links identify with existing stations; other collisions are
/// qualified with the file stem. The first resolution of a name within a
/// file is cached and reused for the rest of the file.
fn resolve_name(
    builder: &NetworkBuilder,
    entry: &FileEntry,
    renames: &mut HashMap<String, String>,
    name: &str,
    diag: &mut Diagnostics,
) -> String {
    if let Some(resolved) = renames.get(name) {
        return resolved.clone();
    }

    let resolved = if builder.contains(name) && !entry.is_link(name) {
        let qualified = format!("{}:{}", entry.stem(), name);
        diag.warning(
            DiagnosticKind::NetworkDuplicate,
            format!(
                "station '{}' in '{}' collides with an earlier file; renamed to '{}'",
                name, entry.path, qualified
            ),
            None,
        );
        debug!(station = name, file = %entry.path, renamed = %qualified, "duplicate station renamed");
        qualified
    } else {
        name.to_string()
    };

    renames.insert(name.to_string(), resolved.clone());
    resolved
}

/// Resolves the declination to apply for one survey under the project's
/// declination policy.
fn effective_declination(
    project: &Project,
    survey: &Survey,
    geomag: Option<&dyn GeomagneticModel>,
) -> f64 {
    match project.flags.declination {
        DeclinationMode::Ignore => 0.0,
        DeclinationMode::Entered => survey.declination,
        DeclinationMode::Auto => match (geomag, project.base) {
            (Some(model), Some(base)) => model.declination(
                base.east,
                base.north,
                base.elevation,
                project.datum.as_deref().unwrap_or(""),
                project.effective_zone().unwrap_or(0),
                survey.date,
            ),
            // No model or no location: fall back to the entered value.
            _ => survey.declination,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karst_model::geomag::ConstantDeclination;
    use karst_model::loading::project::parse_project;
    use karst_model::project::{BaseLocation, FixedStation, FixedUnit};
    use karst_model::survey::Shot;

    fn file_entry(path: &str) -> FileEntry {
        FileEntry {
            path: path.into(),
            ..FileEntry::default()
        }
    }

    fn survey_with(shots: Vec<Shot>) -> Survey {
        let mut survey = Survey::named("CAVE", "S");
        survey.shots = shots;
        survey
    }

    #[test]
    fn test_single_file_assembly() {
        let mut project = Project::default();
        project.files.push(file_entry("a.dat"));
        project.files[0].fixed.push(FixedStation {
            name: "A".into(),
            unit: FixedUnit::Feet,
            east: 0.0,
            north: 0.0,
            vert: 0.0,
        });

        let mut surveys = HashMap::new();
        surveys.insert(
            "a.dat".to_string(),
            vec![survey_with(vec![Shot::of("A", "B", 100.0, 0.0, 0.0)])],
        );

        let mut diag = Diagnostics::new();
        let network = assemble(&project, &surveys, None, &mut diag);

        assert_eq!(network.station_count(), 2);
        assert_eq!(network.shots().len(), 1);
        assert_eq!(network.anchors().len(), 1);
        let a = network.index_of("A").unwrap();
        assert!(network.station(a).fixed);
        assert_eq!(network.station(a).position, Some(Vector3D::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_link_station_rename() {
        // file1 has X1 and P; file2 links P and accidentally reuses X1.
        let mut project = Project::default();
        project.files.push(file_entry("file1.dat"));
        let mut second = file_entry("file2.dat");
        second.links.push("P".into());
        project.files.push(second);

        let mut surveys = HashMap::new();
        surveys.insert(
            "file1.dat".to_string(),
            vec![survey_with(vec![Shot::of("X1", "P", 10.0, 0.0, 0.0)])],
        );
        surveys.insert(
            "file2.dat".to_string(),
            vec![survey_with(vec![
                Shot::of("P", "X2", 10.0, 90.0, 0.0),
                Shot::of("X2", "X1", 10.0, 0.0, 0.0),
            ])],
        );

        let mut diag = Diagnostics::new();
        let network = assemble(&project, &surveys, None, &mut diag);

        // P bridges the files; the stray X1 is qualified.
        assert!(network.index_of("P").is_some());
        assert!(network.index_of("X2").is_some());
        assert!(network.index_of("file2:X1").is_some());
        assert_eq!(network.station_count(), 4);
        assert_eq!(diag.of_kind(DiagnosticKind::NetworkDuplicate).count(), 1);
    }

    #[test]
    fn test_exclusion_flags_respected() {
        let mut project = Project::default();
        project.files.push(file_entry("a.dat"));

        let mut excluded = Shot::of("A", "B", 10.0, 0.0, 0.0);
        excluded.flags.exclude_all = true;
        let mut length_only = Shot::of("B", "C", 10.0, 0.0, 0.0);
        length_only.flags.exclude_length = true;

        let mut surveys = HashMap::new();
        surveys.insert(
            "a.dat".to_string(),
            vec![survey_with(vec![excluded.clone(), length_only])],
        );

        let mut diag = Diagnostics::new();
        let network = assemble(&project, &surveys, None, &mut diag);
        assert_eq!(network.shots().len(), 1);
        assert_eq!(network.surveyed_length(), 0.0);

        // With the master switch off, the X flag is ignored.
        project.flags.apply_shot_flags = false;
        let network = assemble(&project, &surveys, None, &mut diag);
        assert_eq!(network.shots().len(), 2);
        assert_eq!(network.surveyed_length(), 20.0);
    }

    #[test]
    fn test_declination_modes() {
        let mut project = Project::default();
        project.files.push(file_entry("a.dat"));
        project.base = Some(BaseLocation {
            east: 0.0,
            north: 0.0,
            elevation: 0.0,
            zone: 13,
            convergence: 0.0,
        });

        let mut survey = survey_with(vec![Shot::of("A", "B", 100.0, 0.0, 0.0)]);
        survey.declination = 90.0;
        let mut surveys = HashMap::new();
        surveys.insert("a.dat".to_string(), vec![survey]);

        let mut diag = Diagnostics::new();

        // Entered: the 90 degree declination turns the shot east.
        let network = assemble(&project, &surveys, None, &mut diag);
        assert!((network.shots()[0].delta.east - 100.0).abs() < 1e-9);

        // Ignored: the shot stays north.
        project.flags.declination = DeclinationMode::Ignore;
        let network = assemble(&project, &surveys, None, &mut diag);
        assert!((network.shots()[0].delta.north - 100.0).abs() < 1e-9);

        // Auto: the model overrides the entered value.
        project.flags.declination = DeclinationMode::Auto;
        let model = ConstantDeclination(180.0);
        let network = assemble(&project, &surveys, Some(&model), &mut diag);
        assert!((network.shots()[0].delta.north + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_parsed_project_round_trip() {
        let project = parse_project(b"#main.dat,GR1[F,100,200,300];").unwrap();
        let mut surveys = HashMap::new();
        surveys.insert(
            "main.dat".to_string(),
            vec![survey_with(vec![Shot::of("GR1", "GR2", 50.0, 0.0, 0.0)])],
        );

        let mut diag = Diagnostics::new();
        let network = assemble(&project, &surveys, None, &mut diag);
        let anchor = network.index_of("GR1").unwrap();
        assert_eq!(
            network.station(anchor).position,
            Some(Vector3D::new(100.0, 200.0, 300.0))
        );
        assert!(network.station(anchor).fixed);
    }
}

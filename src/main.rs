//! QUIZFETTI - multiple-choice quiz with a particle reward show.
//! Answer with the mouse; your score tier picks the celebration.

use bevy::core::FrameCount;
use bevy::{
    prelude::*,
    window::{CursorOptions, PrimaryWindow},
};

mod effects;
mod layout;
mod question;
mod quiz;

use effects::{CursorTrail, Effects};
use layout::{to_world, Layout, Viewport, BASE_HEIGHT, BASE_WIDTH, OPTION_HEIGHT, OPTION_WIDTH};
use question::{builtin_questions, load_questions};
use quiz::{QuizSession, Screen};

const QUESTIONS_CSV: &str = "assets/quiz.csv";

// COLORS
const BG_COLOR: Color = Color::srgb(0.94, 0.94, 1.0);
const TEXT_DARK: Color = Color::srgb(0.2, 0.2, 0.2);
const BUTTON_IDLE: Color = Color::srgb(0.78, 0.86, 1.0);
const BUTTON_HOVER: Color = Color::srgb(0.59, 0.78, 1.0);
const ENCOURAGE_BLUE: Color = Color::srgb(0.0, 0.59, 1.0);
const CURSOR_PINK: Color = Color::srgb(1.0, 0.0, 0.39);

// Components
#[derive(Component)]
struct ProgressText;
#[derive(Component)]
struct QuestionText;
#[derive(Component)]
struct OptionBox(usize);
#[derive(Component)]
struct OptionLabel(usize);
#[derive(Component)]
struct ResultMessage;
#[derive(Component)]
struct ScoreText;
#[derive(Component)]
struct EncouragementText;

/// Creates a rounded rectangle mesh for the option buttons.
fn rounded_rect_mesh(width: f32, height: f32, radius: f32) -> Mesh {
    use bevy::render::mesh::{Indices, PrimitiveTopology};

    let hw = width / 2.0;
    let hh = height / 2.0;
    let r = radius.min(hw).min(hh);
    let segments = 8; // Segments per corner

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // Center vertex
    positions.push([0.0, 0.0, 0.0]);
    uvs.push([0.5, 0.5]);

    let corners = [
        (hw - r, hh - r, 0.0),
        (-hw + r, hh - r, std::f32::consts::FRAC_PI_2),
        (-hw + r, -hh + r, std::f32::consts::PI),
        (hw - r, -hh + r, std::f32::consts::PI * 1.5),
    ];

    for (cx, cy, start_angle) in corners {
        for i in 0..=segments {
            let angle = start_angle + (i as f32 / segments as f32) * std::f32::consts::FRAC_PI_2;
            let x = cx + r * angle.cos();
            let y = cy + r * angle.sin();
            positions.push([x, y, 0.0]);
            uvs.push([(x / width) + 0.5, (y / height) + 0.5]);
        }
    }

    // Triangle fan around the center vertex
    let num_outer = positions.len() as u32 - 1;
    for i in 1..=num_outer {
        let next = if i == num_outer { 1 } else { i + 1 };
        indices.extend_from_slice(&[0, i, next]);
    }

    Mesh::new(PrimitiveTopology::TriangleList, default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "QUIZFETTI".into(),
                resolution: (BASE_WIDTH, BASE_HEIGHT).into(),
                // The app draws its own cursor dot and trail.
                cursor_options: CursorOptions {
                    visible: false,
                    ..default()
                },
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(BG_COLOR))
        .init_resource::<Layout>()
        .init_resource::<Effects>()
        .init_resource::<CursorTrail>()
        .add_systems(Startup, setup)
        // Chained: layout first, then input, then the state transition,
        // then everything that renders this frame's state.
        .add_systems(
            Update,
            (
                sync_layout,
                click_options,
                advance_session,
                hover_options,
                sync_quiz_ui,
                sync_result_ui,
                effect_particles,
                cursor_sparkles,
            )
                .chain(),
        )
        .run();
}

fn setup(
    mut cmd: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<ColorMaterial>>,
) {
    cmd.spawn(Camera2d);

    let mut questions = match load_questions(QUESTIONS_CSV) {
        Ok(loaded) => loaded,
        Err(err) => {
            warn!("failed to load {QUESTIONS_CSV}: {err}");
            Vec::new()
        }
    };
    questions.extend(builtin_questions());
    info!("quiz ready with {} questions", questions.len());
    cmd.insert_resource(QuizSession::new(questions, &mut rand::rng()));

    // Quiz screen text
    cmd.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(TEXT_DARK),
        Transform::from_xyz(0.0, 0.0, 10.0),
        ProgressText,
    ));
    cmd.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(TEXT_DARK),
        Transform::from_xyz(0.0, 0.0, 10.0),
        QuestionText,
    ));

    // Option buttons + labels
    let button_mesh = meshes.add(rounded_rect_mesh(OPTION_WIDTH, OPTION_HEIGHT, 10.0));
    for slot in 0..layout::OPTION_COUNT {
        cmd.spawn((
            Mesh2d(button_mesh.clone()),
            MeshMaterial2d(mats.add(ColorMaterial::from(BUTTON_IDLE))),
            Transform::from_xyz(0.0, 0.0, 0.0),
            OptionBox(slot),
        ));
        cmd.spawn((
            Text2d::new(""),
            TextFont {
                font_size: 20.0,
                ..default()
            },
            TextColor(TEXT_DARK),
            Transform::from_xyz(0.0, 0.0, 1.0),
            OptionLabel(slot),
        ));
    }

    // Result screen text
    cmd.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 36.0,
            ..default()
        },
        TextColor(TEXT_DARK),
        Transform::from_xyz(0.0, 0.0, 10.0),
        Visibility::Hidden,
        ResultMessage,
    ));
    cmd.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 48.0,
            ..default()
        },
        TextColor(TEXT_DARK),
        Transform::from_xyz(0.0, 0.0, 10.0),
        Visibility::Hidden,
        ScoreText,
    ));
    cmd.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 30.0,
            ..default()
        },
        TextColor(ENCOURAGE_BLUE),
        Transform::from_xyz(0.0, 0.0, 10.0),
        Visibility::Hidden,
        EncouragementText,
    ));
}

/// Recomputes the layout whenever the window size changes. Degenerate
/// sizes (minimized window) keep the previous layout.
fn sync_layout(windows: Query<&Window, With<PrimaryWindow>>, mut layout: ResMut<Layout>) {
    let Ok(win) = windows.get_single() else {
        return;
    };
    let view = Viewport {
        width: win.width(),
        height: win.height(),
    };
    if view == layout.viewport {
        return;
    }
    if let Some(next) = Layout::compute(view) {
        *layout = next;
    }
}

fn click_options(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<Layout>,
    mut session: ResMut<QuizSession>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(win) = windows.get_single() else {
        return;
    };
    let Some(cursor) = win.cursor_position() else {
        return;
    };
    session.select_option(cursor, &layout, &mut rand::rng());
}

fn advance_session(mut session: ResMut<QuizSession>, mut effects: ResMut<Effects>) {
    if session.poll_completion() {
        effects.clear();
        if let Screen::Result(outcome) = session.screen() {
            info!(
                "quiz finished: {}/{} -> {:?}",
                outcome.score, outcome.total, outcome.tier
            );
        }
    }
}

fn hover_options(
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<Layout>,
    session: Res<QuizSession>,
    mut mats: ResMut<Assets<ColorMaterial>>,
    boxes: Query<(&OptionBox, &MeshMaterial2d<ColorMaterial>)>,
) {
    let hovered = windows
        .get_single()
        .ok()
        .and_then(|win| win.cursor_position())
        .and_then(|cursor| layout.hit_option(cursor));
    let active = *session.screen() == Screen::Quiz;

    for (slot, material) in &boxes {
        if let Some(material) = mats.get_mut(&material.0) {
            material.color = if active && hovered == Some(slot.0) {
                BUTTON_HOVER
            } else {
                BUTTON_IDLE
            };
        }
    }
}

fn sync_quiz_ui(
    session: Res<QuizSession>,
    layout: Res<Layout>,
    mut progress: Query<
        (&mut Text2d, &mut TextFont, &mut Transform, &mut Visibility),
        With<ProgressText>,
    >,
    mut question: Query<
        (&mut Text2d, &mut TextFont, &mut Transform, &mut Visibility),
        (With<QuestionText>, Without<ProgressText>),
    >,
    mut boxes: Query<
        (&OptionBox, &mut Transform, &mut Visibility),
        (Without<ProgressText>, Without<QuestionText>),
    >,
    mut labels: Query<
        (
            &OptionLabel,
            &mut Text2d,
            &mut TextFont,
            &mut Transform,
            &mut Visibility,
        ),
        (Without<ProgressText>, Without<QuestionText>, Without<OptionBox>),
    >,
) {
    let view = layout.viewport;
    let s = layout.scale;
    let current = match session.screen() {
        Screen::Quiz => session.current_question(),
        _ => None,
    };
    let vis = if current.is_some() {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };

    for (mut text, mut font, mut t, mut v) in &mut progress {
        *v = vis;
        if current.is_some() {
            text.0 = format!(
                "Question {} of {}",
                session.position() + 1,
                session.total()
            );
            font.font_size = 24.0 * s;
            t.translation = to_world(Vec2::new(view.width / 2.0, 80.0 * s), view).extend(10.0);
        }
    }

    for (mut text, mut font, mut t, mut v) in &mut question {
        *v = vis;
        if let Some(q) = current {
            text.0 = q.text().to_string();
            font.font_size = 28.0 * s;
            let at = Vec2::new(view.width / 2.0, view.height / 2.0 - 50.0 * s);
            t.translation = to_world(at, view).extend(10.0);
        }
    }

    for (slot, mut t, mut v) in &mut boxes {
        *v = vis;
        let region = layout.options[slot.0];
        t.translation = to_world(region.center(), view).extend(0.0);
        t.scale = Vec3::splat(s);
    }

    for (slot, mut text, mut font, mut t, mut v) in &mut labels {
        *v = vis;
        if let Some(q) = current {
            text.0 = q.presented()[slot.0].clone();
            font.font_size = 20.0 * s;
            t.translation = to_world(layout.options[slot.0].center(), view).extend(1.0);
        }
    }
}

fn sync_result_ui(
    session: Res<QuizSession>,
    layout: Res<Layout>,
    effects: Res<Effects>,
    mut message: Query<
        (&mut Text2d, &mut TextFont, &mut Transform, &mut Visibility),
        With<ResultMessage>,
    >,
    mut score: Query<
        (&mut Text2d, &mut TextFont, &mut Transform, &mut Visibility),
        (With<ScoreText>, Without<ResultMessage>),
    >,
    mut encourage: Query<
        (&mut Text2d, &mut TextFont, &mut Transform, &mut Visibility),
        (With<EncouragementText>, Without<ResultMessage>, Without<ScoreText>),
    >,
) {
    let view = layout.viewport;
    let s = layout.scale;

    match session.screen() {
        Screen::Result(outcome) => {
            for (mut text, mut font, mut t, mut v) in &mut message {
                *v = Visibility::Visible;
                text.0 = outcome.message.to_string();
                font.font_size = 36.0 * s;
                let at = Vec2::new(view.width / 2.0, view.height / 3.0);
                t.translation = to_world(at, view).extend(10.0);
            }
            for (mut text, mut font, mut t, mut v) in &mut score {
                *v = Visibility::Visible;
                text.0 = format!("Your score: {} / {}", outcome.score, outcome.total);
                font.font_size = 48.0 * s;
                let at = Vec2::new(view.width / 2.0, view.height / 2.0);
                t.translation = to_world(at, view).extend(10.0);
            }
            for (mut text, mut font, mut t, mut v) in &mut encourage {
                if outcome.encouragement.is_empty() {
                    *v = Visibility::Hidden;
                    continue;
                }
                *v = Visibility::Visible;
                text.0 = outcome.encouragement.to_string();
                font.font_size = 30.0 * s;
                let bounce = (effects.result_frames() as f32 * 0.1).sin() * 10.0 * s;
                let at = Vec2::new(view.width / 2.0, view.height * 0.7 + bounce);
                t.translation = to_world(at, view).extend(10.0);
            }
        }
        Screen::Empty => {
            for (mut text, mut font, mut t, mut v) in &mut message {
                *v = Visibility::Visible;
                text.0 = "No questions available.".to_string();
                font.font_size = 36.0 * s;
                let at = Vec2::new(view.width / 2.0, view.height / 2.0);
                t.translation = to_world(at, view).extend(10.0);
            }
            for (_, _, _, mut v) in &mut score {
                *v = Visibility::Hidden;
            }
            for (_, _, _, mut v) in &mut encourage {
                *v = Visibility::Hidden;
            }
        }
        Screen::Quiz => {
            for (_, _, _, mut v) in &mut message {
                *v = Visibility::Hidden;
            }
            for (_, _, _, mut v) in &mut score {
                *v = Visibility::Hidden;
            }
            for (_, _, _, mut v) in &mut encourage {
                *v = Visibility::Hidden;
            }
        }
    }
}

/// Result-screen celebration: spawn on the tier's cadence, step, draw,
/// then reap, every frame.
fn effect_particles(
    session: Res<QuizSession>,
    layout: Res<Layout>,
    frames: Res<FrameCount>,
    mut effects: ResMut<Effects>,
    mut gizmos: Gizmos,
) {
    let Screen::Result(outcome) = session.screen() else {
        return;
    };
    let view = layout.viewport;
    let mut rng = rand::rng();
    effects.advance(outcome.tier, frames.0 as u64, view, layout.scale, &mut rng);
    effects.draw(&mut gizmos, view);
    effects.reap(view);
}

/// Cursor dot and trail, in every state.
fn cursor_sparkles(
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<Layout>,
    frames: Res<FrameCount>,
    mut trail: ResMut<CursorTrail>,
    mut gizmos: Gizmos,
) {
    let view = layout.viewport;
    let pointer = windows
        .get_single()
        .ok()
        .and_then(|win| win.cursor_position());

    let mut rng = rand::rng();
    trail.advance(frames.0 as u64, pointer, layout.scale, &mut rng);
    trail.draw(&mut gizmos, view);
    trail.reap();

    if let Some(at) = pointer {
        gizmos.circle_2d(to_world(at, view), 4.0 * layout.scale, CURSOR_PINK);
    }
}

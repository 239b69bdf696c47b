use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use spell_core::{
    Audience, CastCheck, CastContext, CastError, CastEvent, CastPhase, CastSource, Caster,
    CasterState, EffectError, ParameterRecord, ParameterTable, ParameterType, ParameterizedSpell,
    RecordingObserver, Spell, SpellCastManager, SpellParameterConfig, SpellParameterLoader,
    SpellParameterSchema, SpellParameters, SpellRegistry, TypedValue, ValidationError,
};
use uuid::Uuid;

const BOLT: &str = "bolt";
const CODE_DEFAULTS: SpellParameterConfig = SpellParameterConfig {
    base_mana_cost: 20,
    mana_cost_per_level: 5,
    base_spell_power: 10,
    spell_power_per_level: 2,
    cast_time: 40,
    cooldown: 10.0,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Behavior {
    Succeed,
    FailEffect,
    Deny,
    FailPrecondition,
    Panic,
}

#[derive(Clone, Debug)]
struct Observation {
    config: SpellParameterConfig,
    params: SpellParameters,
}

struct TestSpell {
    id: &'static str,
    schema: SpellParameterSchema,
    config: SpellParameterConfig,
    behavior: Behavior,
    observed: Rc<RefCell<Vec<Observation>>>,
    completed: Rc<RefCell<u32>>,
}

impl TestSpell {
    fn new(behavior: Behavior) -> Self {
        let schema = SpellParameterSchema::config_builder(&CODE_DEFAULTS)
            .optional("radius", ParameterType::Double, 2.0, "Blast radius")
            .build()
            .unwrap();
        Self {
            id: BOLT,
            schema,
            config: CODE_DEFAULTS,
            behavior,
            observed: Rc::default(),
            completed: Rc::default(),
        }
    }
}

impl Spell for TestSpell {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> &str {
        "Test Bolt"
    }

    fn attempt_initiate_cast(&mut self, _: u32, _: &mut dyn Caster, _: CastSource) -> bool {
        false
    }

    fn as_parameterized(&self) -> Option<&dyn ParameterizedSpell> {
        Some(self)
    }

    fn as_parameterized_mut(&mut self) -> Option<&mut dyn ParameterizedSpell> {
        Some(self)
    }
}

impl ParameterizedSpell for TestSpell {
    fn parameter_schema(&self) -> &SpellParameterSchema {
        &self.schema
    }

    fn parameter_config(&self) -> SpellParameterConfig {
        self.config
    }

    fn set_parameter_config(&mut self, config: SpellParameterConfig) {
        self.config = config;
    }

    fn default_cooldown_ticks(&self) -> i32 {
        CODE_DEFAULTS.cooldown_ticks()
    }

    fn can_be_cast_by(&self, _: u32, _: CastSource, _: &dyn Caster) -> CastCheck {
        match self.behavior {
            Behavior::Deny => CastCheck::Denied(Some("not enough focus".into())),
            _ => CastCheck::Allowed,
        }
    }

    fn check_pre_cast_conditions(&mut self, _: u32, _: &mut dyn Caster) -> bool {
        self.behavior != Behavior::FailPrecondition
    }

    fn on_cast_with_parameters(
        &mut self,
        _ctx: &mut CastContext<'_>,
        params: &SpellParameters,
    ) -> Result<(), EffectError> {
        self.observed.borrow_mut().push(Observation {
            config: self.config,
            params: params.clone(),
        });
        match self.behavior {
            Behavior::FailEffect => Err(EffectError::Failed("fizzled".into())),
            Behavior::Panic => panic!("effect blew up mid-cast"),
            _ => Ok(()),
        }
    }

    fn on_cast_complete(&mut self, _ctx: &mut CastContext<'_>) {
        *self.completed.borrow_mut() += 1;
    }
}

/// Spell with only the fixed cast path.
struct PlainSpell {
    accepts: bool,
}

impl Spell for PlainSpell {
    fn id(&self) -> &str {
        "plain"
    }

    fn name(&self) -> &str {
        "Plain"
    }

    fn attempt_initiate_cast(&mut self, _: u32, _: &mut dyn Caster, source: CastSource) -> bool {
        assert_eq!(source, CastSource::Command);
        self.accepts
    }
}

#[derive(Default)]
struct Registry {
    spells: Vec<Box<dyn Spell>>,
}

impl Registry {
    fn with(mut self, spell: impl Spell + 'static) -> Self {
        self.spells.push(Box::new(spell));
        self
    }
}

impl SpellRegistry for Registry {
    fn spell(&self, id: &str) -> Option<&dyn Spell> {
        self.spells.iter().find(|s| s.id() == id).map(|s| &**s)
    }

    fn spell_mut(&mut self, id: &str) -> Option<&mut dyn Spell> {
        for spell in self.spells.iter_mut() {
            if spell.id() == id {
                return Some(&mut **spell);
            }
        }
        None
    }

    fn spell_ids(&self) -> Vec<&str> {
        self.spells.iter().map(|s| s.id()).collect()
    }
}

struct Fixture {
    registry: Registry,
    caster: CasterState,
    observer: RecordingObserver,
    observed: Rc<RefCell<Vec<Observation>>>,
    completed: Rc<RefCell<u32>>,
}

impl Fixture {
    fn new(behavior: Behavior) -> Self {
        let spell = TestSpell::new(behavior);
        let observed = Rc::clone(&spell.observed);
        let completed = Rc::clone(&spell.completed);
        Self {
            registry: Registry::default().with(spell),
            caster: CasterState::new(Uuid::from_u128(7), 100).with_cooldown_modifier(BOLT, 0.5),
            observer: RecordingObserver::new(),
            observed,
            completed,
        }
    }

    fn cast(
        &mut self,
        loader: &SpellParameterLoader,
        source: CastSource,
        text: &str,
    ) -> Result<spell_core::CastReport, CastError> {
        let mut manager = SpellCastManager::new(loader, &mut self.observer).with_source(source);
        manager.cast_spell(&mut self.registry, &mut self.caster, BOLT, 3, text)
    }

    fn live_config(&self) -> SpellParameterConfig {
        self.registry
            .spell(BOLT)
            .and_then(|s| s.as_parameterized())
            .map(|s| s.parameter_config())
            .unwrap()
    }
}

#[test]
fn command_cast_replays_effects_without_costs() {
    let loader = SpellParameterLoader::empty();
    let mut fx = Fixture::new(Behavior::Succeed);

    let report = fx
        .cast(&loader, CastSource::Command, r#"{"power": 42, "radius": 4}"#)
        .unwrap();

    assert!(!report.fallback);
    assert_eq!(report.message, "cast Test Bolt");
    assert_eq!(report.config.base_spell_power, 42);
    assert_eq!(report.mana_cost, None);
    assert_eq!(report.cooldown_ticks, None);
    assert!(!report.cast_bar_started);
    assert_eq!(fx.caster.mana(), 100);
    assert_eq!(*fx.completed.borrow(), 1);

    let observed = fx.observed.borrow();
    assert_eq!(observed[0].config.base_spell_power, 42);
    assert_eq!(observed[0].params.value("radius"), Some(&TypedValue::Double(4.0)));

    assert_eq!(fx.observer.event_names(), vec!["effect_replay"]);
    let (audience, CastEvent::EffectReplay { data, .. }) = &fx.observer.events()[0] else {
        panic!("expected an effect replay");
    };
    assert_eq!(*audience, Audience::Caster);
    let replayed = SpellParameters::from_binary(data).unwrap();
    assert_eq!(replayed.get_int("baseSpellPower", 0), 42);

    assert_eq!(fx.live_config(), CODE_DEFAULTS);
}

#[test]
fn spellbook_cast_consumes_mana_and_scales_cooldown() {
    let loader = SpellParameterLoader::empty();
    let mut fx = Fixture::new(Behavior::Succeed);

    let report = fx
        .cast(&loader, CastSource::Spellbook, r#"{"cooldown": 5.0}"#)
        .unwrap();

    // 20 + 5 * (3 - 1)
    assert_eq!(report.mana_cost, Some(30));
    assert_eq!(fx.caster.mana(), 70);
    // 100 resolved ticks scaled by live/default = 100/200
    assert_eq!(report.cooldown_ticks, Some(50));
    assert_eq!(fx.caster.cooldown(BOLT), Some(50));
    assert!(report.cast_bar_started);
    assert!(fx.caster.is_casting());

    assert_eq!(
        fx.observer.event_names(),
        vec!["cast_started", "mana_changed", "effect_replay"]
    );
    assert!(matches!(
        fx.observer.events()[0],
        (Audience::Tracking, CastEvent::CastStarted { duration: 40, level: 3, .. })
    ));
    assert_eq!(fx.live_config(), CODE_DEFAULTS);
}

#[test]
fn zero_cooldown_override_uses_live_cooldown() {
    let loader = SpellParameterLoader::empty();
    let mut fx = Fixture::new(Behavior::Succeed);

    let report = fx
        .cast(&loader, CastSource::Spellbook, r#"{"cooldown": 0.0}"#)
        .unwrap();
    assert_eq!(report.cooldown_ticks, Some(100));
}

#[test]
fn cast_bar_is_not_restarted_while_casting() {
    let loader = SpellParameterLoader::empty();
    let mut fx = Fixture::new(Behavior::Succeed);
    fx.caster.initiate_cast("other", 1, 10, CastSource::Spellbook);

    let report = fx.cast(&loader, CastSource::Spellbook, "").unwrap();
    assert!(!report.cast_bar_started);
    assert_eq!(fx.caster.active_cast().map(|c| c.spell_id.as_str()), Some("other"));
}

#[test]
fn mana_never_drops_below_zero() {
    let loader = SpellParameterLoader::empty();
    let mut fx = Fixture::new(Behavior::Succeed);
    fx.caster.set_mana(12);

    let report = fx
        .cast(&loader, CastSource::Spellbook, r#"{"manaCost": 500}"#)
        .unwrap();
    assert_eq!(report.mana_cost, Some(510));
    assert_eq!(fx.caster.mana(), 0);
}

#[test]
fn failed_effect_restores_config_and_interrupts_cast_bar() {
    let loader = SpellParameterLoader::empty();
    let mut fx = Fixture::new(Behavior::FailEffect);
    let before = fx.live_config();

    let err = fx
        .cast(&loader, CastSource::Spellbook, r#"{"manaCost": 1, "castTime": 60}"#)
        .unwrap_err();

    assert!(matches!(err, CastError::Execution { ref spell_id, .. } if spell_id == BOLT));
    assert_eq!(err.phase(), CastPhase::Failed);
    assert_eq!(fx.observed.borrow()[0].config.cast_time, 60);
    assert_eq!(fx.live_config(), before);

    assert_eq!(fx.caster.mana(), 100);
    assert!(!fx.caster.is_casting());
    assert_eq!(fx.caster.cooldown(BOLT), None);
    assert_eq!(*fx.completed.borrow(), 0);
    assert_eq!(fx.observer.event_names(), vec!["cast_started", "cast_finished"]);
    assert!(matches!(
        fx.observer.events()[1].1,
        CastEvent::CastFinished { interrupted: true, .. }
    ));
}

#[test]
fn validation_errors_are_reported_together() {
    let loader = SpellParameterLoader::empty();
    let mut fx = Fixture::new(Behavior::Succeed);

    let err = fx
        .cast(
            &loader,
            CastSource::Command,
            r#"{"bogus": 1, "radius": "wide", "power": 3, "baseSpellPower": 4}"#,
        )
        .unwrap_err();

    let CastError::Validation(errors) = &err else {
        panic!("expected validation failure, got {err:?}");
    };
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.as_slice()[0], ValidationError::UnknownParameter("bogus".into()));
    assert_eq!(errors.as_slice()[2], ValidationError::Duplicate("baseSpellPower".into()));
    assert_eq!(err.to_string().lines().count(), 3);
    assert_eq!(err.phase(), CastPhase::Rejected);

    assert!(fx.observed.borrow().is_empty());
    assert!(fx.observer.events().is_empty());
    assert_eq!(fx.live_config(), CODE_DEFAULTS);
}

#[test]
fn malformed_text_is_a_decode_rejection() {
    let loader = SpellParameterLoader::empty();
    let mut fx = Fixture::new(Behavior::Succeed);

    let err = fx.cast(&loader, CastSource::Command, "{not json").unwrap_err();
    assert!(matches!(err, CastError::Decode(_)));
    assert!(err.to_string().starts_with("failed to parse parameters"));
}

#[test]
fn empty_input_fills_every_default() {
    let loader = SpellParameterLoader::empty();
    let mut fx = Fixture::new(Behavior::Succeed);

    fx.cast(&loader, CastSource::Command, "").unwrap();

    let observed = fx.observed.borrow();
    let params = &observed[0].params;
    assert_eq!(params.len(), 7);
    assert_eq!(params.get_double("radius", 0.0), 2.0);
    assert_eq!(params.get_int("castTime", 0), 40);
    assert_eq!(observed[0].config, CODE_DEFAULTS);
}

#[test]
fn file_layer_applies_to_fields_the_caller_left_out() {
    let table: ParameterTable = [(
        BOLT,
        ParameterRecord {
            cooldown: Some(3.0),
            cast_time: Some(5),
            ..Default::default()
        },
    )]
    .into_iter()
    .collect();
    let loader = SpellParameterLoader::from_table(table);
    let mut fx = Fixture::new(Behavior::Succeed);

    let params = SpellParameters::empty()
        .with("manaCost", 77)
        .with("castTime", 12);
    let mut manager = SpellCastManager::new(&loader, &mut fx.observer);
    manager
        .cast_spell_with(&mut fx.registry, &mut fx.caster, BOLT, 1, &params)
        .unwrap();

    let observed = &fx.observed.borrow()[0];
    assert_eq!(observed.config.base_mana_cost, 77);
    assert_eq!(observed.config.cast_time, 12);
    assert_eq!(observed.config.cooldown, 3.0);
    assert_eq!(observed.config.base_spell_power, CODE_DEFAULTS.base_spell_power);
    // The effect still sees the schema defaults it did not override.
    assert_eq!(observed.params.get_double("cooldown", 0.0), CODE_DEFAULTS.cooldown);
}

#[test]
fn panicking_effect_still_restores_config() {
    let loader = SpellParameterLoader::empty();
    let mut fx = Fixture::new(Behavior::Panic);
    let before = fx.live_config();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        fx.cast(&loader, CastSource::Command, r#"{"power": 99, "cooldown": 1}"#)
    }));

    assert!(outcome.is_err());
    assert_eq!(fx.observed.borrow()[0].config.base_spell_power, 99);
    assert_eq!(fx.live_config(), before);
    assert_eq!(*fx.completed.borrow(), 0);
}

#[test]
fn command_source_bypasses_admissibility() {
    let loader = SpellParameterLoader::empty();

    let mut fx = Fixture::new(Behavior::Deny);
    assert!(fx.cast(&loader, CastSource::Command, "").is_ok());

    let mut fx = Fixture::new(Behavior::Deny);
    let err = fx.cast(&loader, CastSource::Spellbook, "").unwrap_err();
    assert_eq!(err.to_string(), "not enough focus");
    assert_eq!(fx.caster.mana(), 100);
    assert!(fx.observed.borrow().is_empty());

    let mut fx = Fixture::new(Behavior::FailPrecondition);
    let err = fx.cast(&loader, CastSource::Scroll, "").unwrap_err();
    assert!(matches!(err, CastError::PreconditionFailed { .. }));

    let mut fx = Fixture::new(Behavior::Deny);
    let outcome = fx
        .cast(&loader, CastSource::Spellbook, r#"{"bypassConditions": true}"#)
        .map(|report| report.options.bypass_conditions());
    assert_eq!(outcome, Ok(true));
}

#[test]
fn unknown_and_non_parameterized_spells() {
    let loader = SpellParameterLoader::empty();
    let mut observer = RecordingObserver::new();
    let mut caster = CasterState::new(Uuid::nil(), 50);
    let mut registry = Registry::default()
        .with(PlainSpell { accepts: true });
    let mut manager = SpellCastManager::new(&loader, &mut observer);

    let err = manager
        .cast_spell(&mut registry, &mut caster, "missing", 1, "")
        .unwrap_err();
    assert_eq!(err, CastError::UnknownSpell("missing".into()));

    let report = manager
        .cast_spell(&mut registry, &mut caster, "plain", 1, r#"{"anything": 1}"#)
        .unwrap();
    assert!(report.fallback);

    let mut declining = Registry::default().with(PlainSpell { accepts: false });
    let err = manager
        .cast_spell(&mut declining, &mut caster, "plain", 1, "")
        .unwrap_err();
    assert_eq!(err, CastError::FallbackDeclined("plain".into()));
}

#[test]
fn direct_cast_skips_costs_and_notifications() {
    let loader = SpellParameterLoader::empty();
    let mut observer = RecordingObserver::new();
    let manager = SpellCastManager::new(&loader, &mut observer).with_source(CastSource::Spellbook);
    let mut caster = CasterState::new(Uuid::nil(), 100);

    let mut spell = TestSpell::new(Behavior::Deny);
    let params = SpellParameters::empty().with("power", 9);
    manager
        .cast_spell_direct(&mut spell, &mut caster, 2, &params)
        .unwrap();
    assert_eq!(spell.observed.borrow()[0].config.base_spell_power, 9);
    assert_eq!(spell.config, CODE_DEFAULTS);
    assert_eq!(caster.mana(), 100);
    assert_eq!(caster.cooldown(BOLT), None);

    let mut failing = TestSpell::new(Behavior::FailEffect);
    let err = manager
        .cast_spell_direct(&mut failing, &mut caster, 2, &params)
        .unwrap_err();
    assert!(matches!(err, CastError::Execution { .. }));
    assert_eq!(failing.config, CODE_DEFAULTS);

    let bad = SpellParameters::empty().with("power", "lots");
    let err = manager
        .cast_spell_direct(&mut spell, &mut caster, 2, &bad)
        .unwrap_err();
    assert!(matches!(err, CastError::Validation(_)));

    drop(manager);
    assert!(observer.events().is_empty());
}

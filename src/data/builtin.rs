//! The Nuora funnel shipped with the binary.

use std::collections::BTreeMap;

use crate::models::{
    ChartSpec, FunnelDefinition, OptionDef, PathTag, StepDef, StepId, StepKind, PATH_A_COLOR,
    PATH_B_COLOR,
};

pub fn nuora_funnel() -> FunnelDefinition {
    let mut steps = vec![
        StepDef::new("step1", StepKind::Single, "What brings you to Nuora today?")
            .progress(5)
            .option(OptionDef::new("fresh", "I want to feel fresh all day").leads_to("step2"))
            .option(
                OptionDef::new("changes", "I've noticed changes in my intimate comfort")
                    .leads_to("step2"),
            )
            .option(OptionDef::new("exploring", "I'm just exploring").leads_to("step2")),
        StepDef::new(
            "step2",
            StepKind::Multi,
            "Which of these have you noticed lately?",
        )
        .body("Select all that apply.")
        .progress(15)
        .option(OptionDef::new("odor", "Unexpected odor").votes_for(PathTag::A))
        .option(
            OptionDef::new("afternoon", "Feeling less fresh by the afternoon")
                .votes_for(PathTag::A),
        )
        .option(OptionDef::new("cycle", "Changes around my cycle").votes_for(PathTag::A))
        .option(OptionDef::new("dryness", "Dryness or discomfort").votes_for(PathTag::B))
        .option(OptionDef::new("intimacy", "Discomfort during intimacy").votes_for(PathTag::B))
        .option(
            OptionDef::new("menopause", "Changes since menopause began").votes_for(PathTag::B),
        ),
    ];

    steps.extend(path_steps(PathTag::A));
    steps.extend(path_steps(PathTag::B));

    let mut path_entries = BTreeMap::new();
    path_entries.insert(PathTag::A, StepId::new("step3a"));
    path_entries.insert(PathTag::B, StepId::new("step3b"));

    FunnelDefinition {
        title: "Nuora".to_string(),
        start: StepId::new("step1"),
        routing_step: StepId::new("step2"),
        path_entries,
        steps,
    }
}

struct PathCopy {
    concern: &'static str,
    color: &'static str,
    duration_question: &'static str,
    tried: [&'static str; 4],
    stats_title: &'static str,
    stats_body: &'static str,
    when_question: &'static str,
    when: [&'static str; 4],
    proof_title: &'static str,
    timeline_title: &'static str,
    results_title: &'static str,
    results_body: &'static str,
    journey_title: &'static str,
    journey_labels: &'static [&'static str],
    journey_milestones: &'static [&'static str],
}

fn copy_for(path: PathTag) -> PathCopy {
    match path {
        PathTag::A => PathCopy {
            concern: "freshness",
            color: PATH_A_COLOR,
            duration_question: "How long has odor been on your mind?",
            tried: ["Scented washes", "Wipes", "Switching underwear", "Nothing yet"],
            stats_title: "You're far from alone",
            stats_body: "Odor is one of the most common intimate concerns, and it usually \
                         starts with an imbalance rather than with hygiene.",
            when_question: "When do you notice it most?",
            when: ["After workouts", "Around my period", "After intimacy", "Most of the time"],
            proof_title: "Working from within beats masking",
            timeline_title: "Freshness with vs without Nuora",
            results_title: "Your freshness plan is ready",
            results_body: "Nuora supports a balanced microbiome so freshness lasts \
                           without perfumes or extra products.",
            journey_title: "Your Freshness Journey",
            journey_labels: &["Day 1", "Week 1", "Week 2", "Week 3+"],
            journey_milestones: &["Start", "Odor fades", "Balance holds", "New normal"],
        },
        PathTag::B => PathCopy {
            concern: "comfort",
            color: PATH_B_COLOR,
            duration_question: "How long has dryness been bothering you?",
            tried: ["Lubricants", "Moisturizers", "Hormonal options", "Nothing yet"],
            stats_title: "This is more common than you think",
            stats_body: "Dryness affects women at every age, and the intimate environment \
                         plays a bigger role than most people realize.",
            when_question: "When is it most noticeable?",
            when: ["During intimacy", "During the day", "At night", "Most of the time"],
            proof_title: "Restoring balance beats temporary relief",
            timeline_title: "Natural moisture with vs without Nuora",
            results_title: "Your moisture plan is ready",
            results_body: "Nuora helps restore the environment your body needs to keep \
                           natural moisture on its own.",
            journey_title: "Your Moisture Journey",
            journey_labels: &["Week 1", "Week 3", "Week 6+"],
            journey_milestones: &["Environment resets", "Comfort returns", "Natural moisture"],
        },
    }
}

fn path_steps(path: PathTag) -> Vec<StepDef> {
    let copy = copy_for(path);
    let suffix = match path {
        PathTag::A => "a",
        PathTag::B => "b",
    };
    let id = |name: &str| format!("{name}{suffix}");

    let step3 = StepDef::new(id("step3"), StepKind::Single, copy.duration_question)
        .progress(25)
        .option(OptionDef::new("weeks", "A few weeks").leads_to(id("step4")))
        .option(OptionDef::new("months", "A few months").leads_to(id("step4")))
        .option(OptionDef::new("year", "More than a year").leads_to(id("step4")));

    let mut step4 = StepDef::new(id("step4"), StepKind::Multi, "What have you tried so far?")
        .body("Select all that apply.")
        .progress(35)
        .successor(format!("step4{suffix}-stats"));
    for (i, label) in copy.tried.iter().enumerate() {
        step4 = step4.option(OptionDef::new(format!("tried{}", i + 1), *label));
    }

    let stats = StepDef::new(format!("step4{suffix}-stats"), StepKind::Info, copy.stats_title)
        .body(copy.stats_body)
        .progress(40)
        .successor(id("step5"));

    let mut step5 = StepDef::new(id("step5"), StepKind::Multi, copy.when_question)
        .body("Select all that apply.")
        .progress(50)
        .successor(format!("step5{suffix}-proof"));
    for (i, label) in copy.when.iter().enumerate() {
        step5 = step5.option(OptionDef::new(format!("when{}", i + 1), *label));
    }

    let proof = StepDef::new(format!("step5{suffix}-proof"), StepKind::Info, copy.proof_title)
        .body("Conventional treatments mask symptoms. Nuora targets the root cause.")
        .progress(55)
        .successor(id("step6"))
        .chart(ChartSpec::comparison(
            format!("chartPath{}1", path),
            copy.color,
        ));

    let step6 = StepDef::new(
        id("step6"),
        StepKind::Multi,
        "What matters most to you in a solution?",
    )
    .body("Select all that apply.")
    .progress(65)
    .successor(id("step7"))
    .option(OptionDef::new("root", "Works from within"))
    .option(OptionDef::new("gentle", "Gentle, clean ingredients"))
    .option(OptionDef::new("lasting", "Results that last"))
    .option(OptionDef::new("routine", "Easy daily routine"));

    let achievability = format!("step7{suffix}-achievability");
    let step7 = StepDef::new(
        id("step7"),
        StepKind::Single,
        format!("How soon would you like to notice a difference in {}?", copy.concern),
    )
    .progress(75)
    .option(OptionDef::new("asap", "As soon as possible").leads_to(achievability.as_str()))
    .option(OptionDef::new("month", "Within a month").leads_to(achievability.as_str()))
    .option(OptionDef::new("patient", "I'm happy to be patient").leads_to(achievability.as_str()));

    let achievable = StepDef::new(achievability.as_str(), StepKind::Info, "This is achievable")
        .body("Most women notice a change within the first few weeks.")
        .progress(80)
        .successor(id("step8"))
        .chart(ChartSpec::timeline(
            format!("chartPath{}2", path),
            copy.color,
            copy.timeline_title,
        ));

    let loading_id = format!("loading{path}");
    let results_id = format!("results{path}");

    let step8 = StepDef::new(
        id("step8"),
        StepKind::Single,
        "Ready to see your personalized recommendation?",
    )
    .progress(90)
    .option(OptionDef::new("yes", "Yes, show me").leads_to(loading_id.as_str()));

    let loading = StepDef::new(
        loading_id.as_str(),
        StepKind::Loading { path },
        "Analyzing your answers",
    )
    .progress(95)
    .successor(results_id.as_str());

    let results = StepDef::new(results_id.as_str(), StepKind::Results { path }, copy.results_title)
        .body(copy.results_body)
        .progress(100)
        .chart(ChartSpec::journey(
            format!("chartResults{path}"),
            copy.color,
            copy.journey_title,
            copy.journey_labels,
            copy.journey_milestones,
        ));

    vec![
        step3,
        step4,
        stats,
        step5,
        proof,
        step6,
        step7,
        achievable,
        step8,
        loading,
        results,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::validate;

    #[test]
    fn test_builtin_funnel_is_valid() {
        let funnel = nuora_funnel();
        assert!(validate(&funnel).is_ok());
        assert_eq!(funnel.steps.len(), 24);
    }

    #[test]
    fn test_progress_table() {
        let funnel = nuora_funnel();
        let expected = [
            ("step1", 5),
            ("step2", 15),
            ("step3a", 25),
            ("step4b", 35),
            ("step4a-stats", 40),
            ("step5b", 50),
            ("step5a-proof", 55),
            ("step6b", 65),
            ("step7a", 75),
            ("step7b-achievability", 80),
            ("step8a", 90),
            ("loadingB", 95),
            ("resultsA", 100),
        ];
        for (id, percent) in expected {
            assert_eq!(funnel.progress_for(&StepId::new(id)), percent, "{id}");
        }
        assert_eq!(funnel.progress_for(&StepId::new("nowhere")), 0);
    }

    #[test]
    fn test_successor_table() {
        let funnel = nuora_funnel();
        let expected = [
            ("step4a", "step4a-stats"),
            ("step5a", "step5a-proof"),
            ("step6a", "step7a"),
            ("step7a-achievability", "step8a"),
            ("step4b", "step4b-stats"),
            ("step5b", "step5b-proof"),
            ("step6b", "step7b"),
            ("step7b-achievability", "step8b"),
            ("loadingA", "resultsA"),
            ("loadingB", "resultsB"),
        ];
        for (from, to) in expected {
            let step = funnel.step(&StepId::new(from)).unwrap();
            assert_eq!(step.successor, Some(StepId::new(to)), "{from}");
        }
    }

    #[test]
    fn test_charts_per_step() {
        let funnel = nuora_funnel();
        let canvases: Vec<_> = funnel.canvases().collect();
        assert_eq!(
            canvases,
            vec![
                "chartPathA1",
                "chartPathA2",
                "chartResultsA",
                "chartPathB1",
                "chartPathB2",
                "chartResultsB"
            ]
        );
    }
}

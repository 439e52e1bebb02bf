//! Property-based tests for the generation pipeline.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use crate::markup::{Latex, MarkupSerializer};
    use crate::oracle::{ground_truth, Artifact, DocumentCompiler};
    use crate::printable::{printable, GenerationCase};
    use crate::strategy::subjects;
    use crate::{
        round_trip, Campaign, CampaignConfig, CampaignError, CompileError, GeneratorConfig, Outcome,
    };

    /// Accepts any markup without `\sin`, echoing it back as the artifact.
    #[derive(Clone, Default)]
    struct Picky {
        accepted: Rc<RefCell<Vec<String>>>,
    }

    impl DocumentCompiler for Picky {
        fn compile(&self, markup: &str) -> Result<Artifact, CompileError> {
            if markup.contains("\\sin") {
                return Err(CompileError::MissingArtifact("pdf".into()));
            }
            self.accepted.borrow_mut().push(markup.to_string());
            Ok(Artifact::new(markup.as_bytes().to_vec(), "pdf"))
        }
    }

    struct Refusing;

    impl DocumentCompiler for Refusing {
        fn compile(&self, _: &str) -> Result<Artifact, CompileError> {
            Err(CompileError::MissingArtifact("pdf".into()))
        }
    }

    fn campaign(cases: u32, seed: u64) -> Campaign {
        Campaign::new(CampaignConfig {
            cases,
            seed: Some(seed),
            ..CampaignConfig::default()
        })
    }

    fn drawn_cases(seed: u64) -> Vec<GenerationCase> {
        let seen = RefCell::new(Vec::new());
        let strategy = printable(subjects(&GeneratorConfig::default()), Latex);
        campaign(48, seed)
            .run(&strategy, |case| {
                seen.borrow_mut().push(case.clone());
                Ok(())
            })
            .unwrap();
        seen.into_inner()
    }

    #[test]
    fn same_seed_draws_same_cases() {
        let first = drawn_cases(0x7e7c);
        assert_eq!(first.len(), 48);
        assert_eq!(first, drawn_cases(0x7e7c));
        assert_ne!(first, drawn_cases(0x7e7d));
    }

    #[test]
    fn refusing_compiler_exhausts_instead_of_failing() {
        let config = CampaignConfig {
            cases: 4,
            seed: Some(5),
            max_local_rejects: 64,
            ..CampaignConfig::default()
        };
        let result = round_trip(
            &Campaign::new(config),
            &GeneratorConfig::default(),
            Latex,
            Latex,
            Some(Refusing),
        );
        assert!(matches!(result, Err(CampaignError::Exhausted(_))));
    }

    #[test]
    fn failures_only_come_from_accepted_markup() {
        let compiler = Picky::default();
        let accepted = Rc::clone(&compiler.accepted);
        let outcome = round_trip(
            &campaign(128, 21),
            &GeneratorConfig::default(),
            Latex,
            Latex,
            Some(compiler),
        )
        .unwrap();
        let Outcome::Failed { report, .. } = outcome else {
            panic!("expected a failure, got {outcome:?}");
        };
        assert!(!report.markup.contains("\\sin"));
        assert!(accepted.borrow().contains(&report.markup));
        assert!(report.artifact.is_some());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn printable_markup_is_the_serializer_output(
            case in printable(subjects(&GeneratorConfig::default()), Latex)
        ) {
            prop_assert!(!case.markup.trim().is_empty());
            prop_assert_eq!(Latex.serialize(&case.expr).ok(), Some(case.markup));
        }

        #[test]
        fn oracle_cases_were_accepted_by_the_compiler(
            oracle in ground_truth(
                printable(subjects(&GeneratorConfig::default()), Latex),
                Picky::default(),
            )
        ) {
            prop_assert!(!oracle.case.markup.contains("\\sin"));
            prop_assert_eq!(oracle.artifact.bytes(), oracle.case.markup.as_bytes());
        }

        #[test]
        fn generated_relations_stay_at_the_top(
            expr in subjects(&GeneratorConfig::default())
        ) {
            for child in expr.children() {
                prop_assert!(!child.class_chain().contains(&"Relational"));
            }
        }
    }
}

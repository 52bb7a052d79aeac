mod common;

#[cfg(test)]
mod resolver_tests {
    use std::io;

    use super::common::{parse_program, run, run_ok, static_errors};

    use rox::interpreter::Interpreter;
    use rox::resolver::Resolver;
    use rox::runner::RunError;

    #[test]
    fn test_unused_local_is_reported() {
        assert_eq!(
            static_errors("{ var x = 1; }"),
            vec!["Local variable 'x' is never used."]
        );
        assert_eq!(run_ok("{ var x = 1; print x; }"), "1\n");
    }

    #[test]
    fn test_globals_are_never_reported_unused() {
        assert_eq!(run_ok("var unused = 1;"), "");
    }

    #[test]
    fn test_assignment_counts_as_use() {
        assert_eq!(run_ok("{ var x; x = 2; }"), "");
    }

    #[test]
    fn test_unused_parameter_and_local_function() {
        assert_eq!(
            static_errors("fun f(a) { return 1; } print f(1);"),
            vec!["Local variable 'a' is never used."]
        );
        assert_eq!(
            static_errors("{ fun g() {} }"),
            vec!["Local variable 'g' is never used."]
        );
    }

    #[test]
    fn test_unused_errors_are_ordered_by_line() {
        let source = "{\n  var b = 1;\n  var a = 2;\n  var c = 3;\n}";
        let errors = match run(source).1 {
            Err(RunError::Static(errors)) => errors,
            other => panic!("expected static errors, got {:?}", other),
        };

        let lines: Vec<Option<usize>> = errors.iter().map(|e| e.line()).collect();
        assert_eq!(lines, vec![Some(2), Some(3), Some(4)]);
        assert_eq!(
            errors[0].to_string(),
            "[line 2] Error at 'b': Local variable 'b' is never used."
        );
    }

    #[test]
    fn test_read_in_own_initializer() {
        assert_eq!(
            static_errors("var a = 1; { var a = a; print a; }"),
            vec!["Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_global_may_reference_itself() {
        assert_eq!(run_ok("var a = \"outer\"; var a = a + \"!\"; print a;"), "outer!\n");
    }

    #[test]
    fn test_duplicate_declaration_in_one_scope() {
        assert_eq!(
            static_errors("{ var a = 1; var a = 2; print a; }"),
            vec!["Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn test_shadowing_across_scopes_is_legal() {
        let source = "{ var a = 1; { var a = 2; print a; } print a; }";
        assert_eq!(run_ok(source), "2\n1\n");
    }

    #[test]
    fn test_return_checks() {
        assert_eq!(
            static_errors("return 1;"),
            vec!["Can't return from top-level code."]
        );
        assert_eq!(
            static_errors("class A { init() { return 1; } }"),
            vec!["Can't return a value from an initializer."]
        );
    }

    #[test]
    fn test_this_and_super_placement() {
        assert_eq!(
            static_errors("print this;"),
            vec!["Can't use 'this' outside of a class."]
        );
        assert_eq!(
            static_errors("fun f() { return super.m(); } print f;"),
            vec!["Can't use 'super' outside of a class."]
        );
        assert_eq!(
            static_errors("class A { m() { return super.m(); } }"),
            vec!["Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn test_class_cannot_inherit_from_itself() {
        assert_eq!(
            static_errors("class A < A {}"),
            vec!["A class can't inherit from itself."]
        );
    }

    #[test]
    fn test_several_errors_in_one_pass() {
        let errors = static_errors("return 1;\n{ var a = 1; var a = 2; print a; }\nprint this;");
        assert_eq!(
            errors,
            vec![
                "Can't return from top-level code.",
                "Already a variable with this name in this scope.",
                "Can't use 'this' outside of a class.",
            ]
        );
    }

    #[test]
    fn test_static_errors_prevent_execution() {
        let (output, result) = run("print 1;\n{ var x; }");
        assert_eq!(output, "");
        assert!(matches!(result, Err(RunError::Static(_))));
    }

    #[test]
    fn test_closures_bind_at_declaration() {
        let source = r#"
            var a = "global";
            {
                fun showA() {
                    print a;
                }

                showA();
                var a = "block";
                showA();
                print a;
            }
        "#;

        assert_eq!(run_ok(source), "global\nglobal\nblock\n");
    }

    #[test]
    fn test_rejected_pass_records_no_distances() {
        let mut interpreter = Interpreter::with_output(Box::new(io::sink()));

        let rejected = parse_program("{ var x = 1; print x; var unused; }").expect("parses");
        assert!(Resolver::new(&mut interpreter).resolve(&rejected).is_err());
        assert_eq!(interpreter.resolved_locals(), 0);

        let accepted = parse_program("{ var x = 1; print x; x = 2; }").expect("parses");
        Resolver::new(&mut interpreter)
            .resolve(&accepted)
            .expect("resolves");
        assert_eq!(interpreter.resolved_locals(), 2);
    }
}

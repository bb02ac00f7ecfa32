/*
 * integration_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end scenarios for undertemplate: interpolation, escaping,
 * conditionals, loops, structural errors and custom syntax.
 */

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use undertemplate::{Syntax, Template, TemplateContext, TemplateError};

fn ctx(value: Value) -> TemplateContext {
    match value {
        Value::Object(entries) => TemplateContext::from(entries),
        other => panic!("context must be an object, got {other}"),
    }
}

/// Compile with an optional syntax and render against `data`.
fn render(source: &str, data: Value, syntax: Option<&Syntax>) -> String {
    let template = match syntax {
        Some(syntax) => Template::compile_with_syntax(source, syntax),
        None => Template::compile(source),
    }
    .unwrap_or_else(|e| panic!("failed to compile {source:?}: {e}"));
    template.render(&ctx(data))
}

fn compile_error(source: &str) -> TemplateError {
    Template::compile(source).expect_err("template should not compile")
}

/// The interpolation suite, run once per directive opener.
fn interpolation_suite(open: &str, person: Value, expected: &str) {
    let first = person["firstName"].as_str().unwrap().to_string();
    let last = person["lastName"].as_str().unwrap().to_string();

    // single simple value
    assert_eq!(
        render(
            &format!("Hello {open} name %>"),
            json!({ "name": format!("{first} {last}") }),
            None
        ),
        expected
    );
    // multiple simple values
    assert_eq!(
        render(
            &format!("Hello {open} firstName %> {open} lastName %>"),
            person.clone(),
            None
        ),
        expected
    );
    // nested objects
    assert_eq!(
        render(
            &format!("Hello {open} person.firstName %> {open} person.lastName %>"),
            json!({ "person": person.clone() }),
            None
        ),
        expected
    );
    // arrays
    assert_eq!(
        render(
            &format!("Hello {open} people[0].firstName %> {open} people[0].lastName %>"),
            json!({ "people": [person.clone()] }),
            None
        ),
        expected
    );
    // deeply nested objects
    assert_eq!(
        render(
            &format!(
                "Hello {open} data.people[0].firstName %> {open} data.people[0].lastName %>"
            ),
            json!({ "data": { "people": [person] } }),
            None
        ),
        expected
    );
}

#[test]
fn test_basic_operation() {
    interpolation_suite(
        "<%=",
        json!({"firstName": "John", "lastName": "Smith"}),
        "Hello John Smith",
    );
}

#[test]
fn test_does_not_escape_interpolated() {
    interpolation_suite(
        "<%=",
        json!({"firstName": "John<br>", "lastName": "Smith"}),
        "Hello John<br> Smith",
    );
}

#[test]
fn test_escapes_interpolated() {
    interpolation_suite(
        "<%-",
        json!({"firstName": "John<br>", "lastName": "Smith"}),
        "Hello John&lt;br&gt; Smith",
    );
}

#[test]
fn test_simple_if() {
    let source = "A<%if(test)%>B<%end%>C";
    assert_eq!(render(source, json!({"test": false}), None), "AC");
    assert_eq!(render(source, json!({"test": true}), None), "ABC");
}

#[test]
fn test_simple_if_else() {
    let source = "A<%if(test)%>B<%else%>C<%end%>D";
    assert_eq!(render(source, json!({"test": false}), None), "ACD");
    assert_eq!(render(source, json!({"test": true}), None), "ABD");
}

#[test]
fn test_conditional_with_white_space() {
    assert_eq!(
        render(
            " A <% if\t ( test\t\t) %> B <%      else %> C <%\tend\t%> D ",
            json!({"test": false}),
            None
        ),
        " A  C  D "
    );
}

#[test]
fn test_multiple_conditionals() {
    assert_eq!(
        render(
            "A<%if(test)%>B<%else%>C<%end%>D-1<% if (another) %>2<% else %>3<% end %>4",
            json!({"test": true, "another": false}),
            None
        ),
        "ABD-134"
    );
}

#[test]
fn test_nested_conditionals() {
    let source = "A<%if(test)%>-1<% if (another) %>2<% else %>3<% end %>4-<%else%>-5<% if (another) %>6<% else %>7<% end %>8-<%end%>D";
    assert_eq!(
        render(source, json!({"test": true, "another": false}), None),
        "A-134-D"
    );
    assert_eq!(
        render(source, json!({"test": false, "another": true}), None),
        "A-568-D"
    );
}

#[test]
fn test_conditional_containing_loops_containing_conditionals() {
    let source = "Letters: <%if(test)%><%for(word,letter)%><%if(letter_index)%>-<%end%><%-letter%><%end%>\
                  <%else%><%for(word,letter)%><%if(letter_index)%>_<%end%><%-letter%><%end%><%end%>";
    let word: Vec<String> = "SPECIAL".chars().map(String::from).collect();
    assert_eq!(
        render(source, json!({"test": true, "word": word.clone()}), None),
        "Letters: S-P-E-C-I-A-L"
    );
    assert_eq!(
        render(source, json!({"test": false, "word": word}), None),
        "Letters: S_P_E_C_I_A_L"
    );
}

fn scores() -> Value {
    json!([
        { "name": "Larry", "score": 74, "pass": true },
        { "name": "Moe", "score": 92, "pass": true },
        { "name": "Curly", "score": 51, "pass": false },
    ])
}

#[test]
fn test_simple_loop() {
    let source = "I like<% for (fruits, fruit) %> <%-fruit%>,<% end %>";
    assert_eq!(
        render(
            source,
            json!({"fruits": ["apples", "oranges", "bananas"]}),
            None
        ),
        "I like apples, oranges, bananas,"
    );
    assert_eq!(render(source, json!({"fruits": []}), None), "I like");
}

#[test]
fn test_loop_over_collection_of_objects() {
    assert_eq!(
        render(
            "Test Scores<br>\n<% for (results, rec) %> <%- rec.name %>: <%- rec.score %>%<br>\n<% end %>",
            json!({"results": scores()}),
            None
        ),
        "Test Scores<br>\n Larry: 74%<br>\n Moe: 92%<br>\n Curly: 51%<br>\n"
    );
}

#[test]
fn test_loop_containing_conditionals() {
    assert_eq!(
        render(
            "Test Scores<br>\n<% for (results, $rec) %> <%- $rec.name %>: <%- $rec.score %>% \
             <% if ($rec.pass) %>PASS<% else %>FAIL<% end %><br>\n<% end %>",
            json!({"results": scores()}),
            None
        ),
        "Test Scores<br>\n Larry: 74% PASS<br>\n Moe: 92% PASS<br>\n Curly: 51% FAIL<br>\n"
    );
}

#[test]
fn test_loop_over_object_values() {
    assert_eq!(
        render(
            "<% for (team, member) %><%= member.name %> <% end %>",
            json!({"team": {"lead": {"name": "Ann"}, "dev": {"name": "Bob"}}}),
            None
        ),
        "Ann Bob "
    );
}

#[test]
fn test_unexpected_end() {
    let err = compile_error("<%end%>");
    assert!(matches!(err, TemplateError::UnexpectedEnd { .. }));
    assert!(
        err.to_string()
            .contains("unexpected end of template structure")
    );
}

#[test]
fn test_unexpected_else() {
    let err = compile_error("<%else%>");
    assert!(matches!(err, TemplateError::UnexpectedElse { .. }));
    assert!(err.to_string().contains("unexpected else"));
}

#[test]
fn test_unending_if() {
    let err = compile_error("<% if (test) %>");
    assert!(matches!(err, TemplateError::UnterminatedIf { .. }));
    assert!(err.to_string().contains("unterminated if"));
}

#[test]
fn test_unending_loop() {
    let err = compile_error("<% for (list,_it) %>");
    assert!(matches!(err, TemplateError::UnterminatedLoop { .. }));
    assert!(err.to_string().contains("unterminated loop"));
}

#[test]
fn test_escape_pattern_setting() {
    let syntax = Syntax::new().with_escape(r"&\{([^}]+?)\}");
    assert_eq!(
        render(
            "&{message}",
            json!({"message": "test & verify"}),
            Some(&syntax)
        ),
        "test &amp; verify"
    );
}

#[test]
fn test_interpolate_pattern_setting() {
    let syntax = Syntax::new().with_interpolate(r"\$\{([^}]+?)\}");
    assert_eq!(
        render(
            "${message}",
            json!({"message": "test & verify"}),
            Some(&syntax)
        ),
        "test & verify"
    );
}

#[test]
fn test_loop_and_end_pattern_settings() {
    let syntax = Syntax::new()
        .with_loop(r"«\s*loop\s*([^»]+?) as ([^»]+?)»")
        .with_terminate(r"«\s*(end)\s*»");
    assert_eq!(
        render(
            r#"«loop items as item»"<%-item%>", «end»"#,
            json!({"items": ["A", "B", "C"]}),
            Some(&syntax)
        ),
        r#""A", "B", "C", "#
    );
}

#[test]
fn test_if_and_end_pattern_settings() {
    let syntax = Syntax::new()
        .with_conditional(r"##\s*IF\s([^#]+?)\sTHEN\s*##")
        .with_alternative(r"##\s*(ELSE)\s*##")
        .with_terminate(r"##\s*(END)\s*##");
    let source = "## IF test THEN ##True## ELSE ##False## END ##";
    assert_eq!(render(source, json!({"test": false}), Some(&syntax)), "False");
    assert_eq!(render(source, json!({"test": true}), Some(&syntax)), "True");
}

#[test]
fn test_custom_syntax_keeps_semantics() {
    let syntax = Syntax::new()
        .with_escape(r"\{\{(?P<path>[^#/:{}][^}]*)\}\}")
        .with_interpolate(r"\{\{\{(?P<path>[^}]+)\}\}\}")
        .with_loop(r"\{\{#each (?P<collection>[^ ]+) as (?P<alias>[^}]+)\}\}")
        .with_conditional(r"\{\{#if ([^}]+)\}\}")
        .with_alternative(r"\{\{:else\}\}")
        .with_terminate(r"\{\{/(?:each|if)\}\}");
    let data = json!({"xs": ["<a>", "b"], "show": true});

    let custom = render(
        "{{#each xs as x}}{{#if show}}{{x}}|{{{x}}}{{:else}}-{{/if}};{{/each}}",
        data.clone(),
        Some(&syntax),
    );
    let default = render(
        "<%for(xs,x)%><%if(show)%><%-x%>|<%=x%><%else%>-<%end%>;<%end%>",
        data,
        None,
    );
    // Escape is listed before interpolate, but "{{{" starts one byte earlier
    assert_eq!(custom, "&lt;a&gt;|<a>;b|b;");
    assert_eq!(custom, default);
}

#[test]
fn test_template_reuse_across_contexts() {
    let template = Template::compile("<%= greeting %>, <%= name %>").unwrap();
    assert_eq!(
        template.render(&ctx(json!({"greeting": "Hi", "name": "A"}))),
        "Hi, A"
    );
    assert_eq!(
        template.render(&ctx(json!({"greeting": "Bye", "name": "B"}))),
        "Bye, B"
    );
}

#[test]
fn test_null_value_renders_empty() {
    let data = json!({"present": null, "list": [null, "x"]});
    assert_eq!(render("[<%= present %>]", data.clone(), None), "[]");
    assert_eq!(render("[<%- present %>]", data.clone(), None), "[]");
    assert_eq!(render("[<%= absent %>]", data.clone(), None), "[]");
    assert_eq!(render("[<%= list %>]", data.clone(), None), "[,x]");
    assert_eq!(
        render("<%if(present)%>set<%else%>unset<%end%>", data, None),
        "unset"
    );
}

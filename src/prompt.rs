//! Generative prompt construction.
//!
//! The template owns the exact marker vocabulary the parser consumes; any
//! change here must move in lockstep with [`crate::parser::SectionMarker`].

/// Fills `{{key}}` placeholders in a template.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

pub fn build_translation_prompt(phrase: &str, source_lang: &str, target_lang: &str) -> String {
    render_template(
        TRANSLATION_PROMPT,
        &[
            ("phrase", phrase),
            ("source_lang", source_lang),
            ("target_lang", target_lang),
        ],
    )
}

const TRANSLATION_PROMPT: &str = r#"Tarefa: Tradução, Análise Gramatical, Mapeamento de Segmentos para Coloração e Geração de Quiz de Vocabulário.

Frase Original: '{{phrase}}'
Idioma Original: '{{source_lang}}'
Idioma Destino: '{{target_lang}}'

Por favor, execute as seguintes ações:
1. Traduza a 'Frase Original' para o 'Idioma Destino'. Apresente apenas o texto traduzido puro para esta parte.
2. Forneça uma explicação concisa (1-2 frases) da estrutura gramatical principal da 'Frase Original'.
3. Forneça uma explicação concisa (1-2 frases) da estrutura gramatical principal da frase traduzida, destacando as principais diferenças ou semelhanças com a original.
4. Identifique segmentos de palavras correspondentes entre a 'Frase Original' e a frase traduzida. Um segmento pode ser uma única palavra ou uma expressão composta (ex: 'gostaria de' correspondendo a 'would like'). Gere uma lista JSON de objetos com as chaves 'original_segment' e 'translated_segment'. Tente cobrir todas as partes das frases e garanta que o JSON seja válido.
5. Gere um quiz de vocabulário com exatamente 3 questões sobre palavras ou segmentos curtos da frase original. Cada questão tem: question_prompt, options (3 opções no idioma destino, uma correta), correct_option_index (base 0), original_tested_word, correct_translation.

Responda estruturando claramente cada parte usando os seguintes marcadores EXATOS:
TRADUCAO:
[Aqui a frase traduzida]

GRAMATICA_ORIGINAL:
[Aqui a explicação da gramática original]

GRAMATICA_TRADUZIDA:
[Aqui a explicação da gramática traduzida]

MAPEAMENTO_JSON:
```json
[
  {"original_segment": "...", "translated_segment": "..."}
]
```

QUIZ_VOCABULARIO_JSON:
```json
[
  {
    "question_prompt": "...",
    "options": ["...", "...", "..."],
    "correct_option_index": 0,
    "original_tested_word": "...",
    "correct_translation": "..."
  }
]
```
"#;

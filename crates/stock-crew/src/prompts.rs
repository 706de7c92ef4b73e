//! Personas and task instructions for the four crew roles
//!
//! Every role has a Brazilian Portuguese and an English rendition. The
//! expected-output text guides the model only; answers are not checked
//! against it.

use crate::config::ResponseLanguage;

/// The four seats of the crew, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrewRole {
    Technical,
    Fundamental,
    Moderator,
    Investment,
}

/// Role, goal and backstory of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

/// Instruction and expected output of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskBrief {
    pub description: &'static str,
    pub expected_output: &'static str,
}

impl CrewRole {
    /// All roles in execution order
    pub const ALL: [Self; 4] = [
        Self::Technical,
        Self::Fundamental,
        Self::Moderator,
        Self::Investment,
    ];

    /// Analysts research the web; moderator and investment analyst work from context
    pub fn uses_search(self) -> bool {
        matches!(self, Self::Technical | Self::Fundamental)
    }

    pub fn allows_delegation(self) -> bool {
        matches!(self, Self::Technical | Self::Fundamental)
    }

    pub fn persona(self, language: ResponseLanguage) -> Persona {
        match language {
            ResponseLanguage::Portuguese => persona_pt(self),
            ResponseLanguage::English => persona_en(self),
        }
    }

    pub fn brief(self, language: ResponseLanguage) -> TaskBrief {
        match language {
            ResponseLanguage::Portuguese => brief_pt(self),
            ResponseLanguage::English => brief_en(self),
        }
    }
}

fn persona_pt(role: CrewRole) -> Persona {
    match role {
        CrewRole::Technical => Persona {
            role: "Analista Técnico",
            goal: "Analisar gráficos e indicadores técnicos para identificar sinais de compra de ações",
            backstory: "Você é um especialista em análise técnica, com anos de experiência em \
                        identificar padrões gráficos e usar indicadores para prever movimentos de \
                        preços. Você conversa em Português (pt-BR).",
        },
        CrewRole::Fundamental => Persona {
            role: "Analista Fundamentalista",
            goal: "Analisar notícias e tendências de mercado para identificar ações promissoras",
            backstory: "Você é um analista fundamentalista com uma profunda compreensão de notícias \
                        de mercado e das tendências econômicas que impactam o valor das ações. \
                        Você conversa em Português (pt-BR).",
        },
        CrewRole::Moderator => Persona {
            role: "Moderador",
            goal: "Facilitar a discussão entre os analistas para chegar a um consenso sobre as \
                   melhores ações",
            backstory: "Você é um moderador experiente, especializado em facilitar discussões e \
                        ajudar grupos a chegarem a um consenso. Você conversa em Português (pt-BR).",
        },
        CrewRole::Investment => Persona {
            role: "Analista de Investimentos",
            goal: "Avaliar recomendações dos analistas técnico e fundamentalista e criar um \
                   relatório detalhado",
            backstory: "Você é um analista de investimentos experiente, especializado em sintetizar \
                        análises técnicas e fundamentalistas para fazer recomendações de \
                        investimento. Você conversa em Português (pt-BR).",
        },
    }
}

fn brief_pt(role: CrewRole) -> TaskBrief {
    match role {
        CrewRole::Technical => TaskBrief {
            description: "Pesquisar ações brasileiras listadas na B3 com maior liquidez e analisar \
                          os gráficos e preços para identificar até 5 papéis com os melhores sinais \
                          de compra. Utilize indicadores técnicos e padrões gráficos para fazer suas \
                          recomendações. Liste os nomes das ações recomendadas e explique \
                          brevemente o motivo da recomendação para cada uma.",
            expected_output: "Uma lista de até 5 papéis recomendados com base em análise técnica, \
                              incluindo os nomes das ações e uma breve explicação de cada \
                              recomendação.",
        },
        CrewRole::Fundamental => TaskBrief {
            description: "Avaliar notícias e tendências de mercado do site br.investing.com para \
                          identificar até 5 papéis promissores. Considere fatores econômicos, \
                          notícias corporativas e tendências de mercado. Utilize o site \
                          br.investing.com para encontrar as notícias mais recentes sobre o cenário \
                          econômico. Liste os nomes das ações recomendadas e explique brevemente o \
                          motivo da recomendação para cada uma.",
            expected_output: "Uma lista de até 5 papéis recomendados com base em análise \
                              fundamentalista, incluindo os nomes das ações e uma breve explicação \
                              de cada recomendação.",
        },
        CrewRole::Moderator => TaskBrief {
            description: "Facilitar uma discussão entre os analistas técnico e fundamentalista para \
                          chegarem a um consenso sobre as melhores ações. A discussão deve \
                          considerar as recomendações de ambos os analistas e chegar a uma lista \
                          final de 5 ações com suas respectivas siglas na B3 e uma breve explicação \
                          para cada escolha.",
            expected_output: "Uma lista final de 5 ações recomendadas com base na análise técnica e \
                              fundamentalista, incluindo o preço de entrada e saída da operação, as \
                              siglas da B3 e uma breve explicação de cada recomendação.",
        },
        CrewRole::Investment => TaskBrief {
            description: "Receber as recomendações dos analistas técnico e fundamentalista, \
                          avaliá-las e criar um relatório detalhado. O relatório deve incluir as 5 \
                          ações recomendadas, os motivos para cada recomendação fornecidos pelos \
                          analistas técnico e fundamentalista, e uma avaliação final de cada \
                          recomendação.",
            expected_output: "Um relatório detalhado com as 5 ações recomendadas, incluindo os \
                              motivos fornecidos pelos analistas técnico e fundamentalista, e uma \
                              avaliação final de cada recomendação.",
        },
    }
}

fn persona_en(role: CrewRole) -> Persona {
    match role {
        CrewRole::Technical => Persona {
            role: "Technical Analyst",
            goal: "Analyse charts and technical indicators to identify stock buy signals",
            backstory: "You are a technical analysis specialist with years of experience spotting \
                        chart patterns and using indicators to anticipate price moves.",
        },
        CrewRole::Fundamental => Persona {
            role: "Fundamental Analyst",
            goal: "Analyse market news and trends to identify promising stocks",
            backstory: "You are a fundamental analyst with a deep understanding of market news and \
                        the economic trends that drive stock valuations.",
        },
        CrewRole::Moderator => Persona {
            role: "Moderator",
            goal: "Facilitate the discussion between the analysts to reach consensus on the best \
                   stocks",
            backstory: "You are an experienced moderator who specialises in guiding discussions \
                        and helping groups reach consensus.",
        },
        CrewRole::Investment => Persona {
            role: "Investment Analyst",
            goal: "Evaluate the technical and fundamental recommendations and write a detailed \
                   report",
            backstory: "You are a seasoned investment analyst who synthesises technical and \
                        fundamental analysis into investment recommendations.",
        },
    }
}

fn brief_en(role: CrewRole) -> TaskBrief {
    match role {
        CrewRole::Technical => TaskBrief {
            description: "Research the most liquid Brazilian stocks listed on the B3 and analyse \
                          their charts and prices to identify up to 5 tickers with the strongest \
                          buy signals. Use technical indicators and chart patterns for your \
                          recommendations. List the recommended stocks and briefly explain the \
                          reason for each one.",
            expected_output: "A list of up to 5 tickers recommended on technical grounds, with the \
                              stock names and a short explanation for each recommendation.",
        },
        CrewRole::Fundamental => TaskBrief {
            description: "Review market news and trends from br.investing.com to identify up to 5 \
                          promising tickers. Consider economic factors, corporate news and market \
                          trends, using br.investing.com for the latest news on the economic \
                          outlook. List the recommended stocks and briefly explain the reason for \
                          each one.",
            expected_output: "A list of up to 5 tickers recommended on fundamental grounds, with \
                              the stock names and a short explanation for each recommendation.",
        },
        CrewRole::Moderator => TaskBrief {
            description: "Moderate a discussion between the technical and fundamental analysts so \
                          they agree on the best stocks. The discussion must weigh both analysts' \
                          recommendations and end with a final list of 5 stocks with their B3 \
                          tickers and a short explanation for each pick.",
            expected_output: "A final list of 5 recommended stocks based on technical and \
                              fundamental analysis, including entry and exit prices, B3 tickers \
                              and a short explanation for each recommendation.",
        },
        CrewRole::Investment => TaskBrief {
            description: "Take the technical and fundamental analysts' recommendations, evaluate \
                          them and write a detailed report. The report must cover the 5 \
                          recommended stocks, the reasons each analyst gave, and a final \
                          assessment of every recommendation.",
            expected_output: "A detailed report on the 5 recommended stocks, including the reasons \
                              given by the technical and fundamental analysts and a final \
                              assessment of each recommendation.",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portuguese_roles() {
        let roles: Vec<_> = CrewRole::ALL
            .iter()
            .map(|r| r.persona(ResponseLanguage::Portuguese).role)
            .collect();
        assert_eq!(
            roles,
            [
                "Analista Técnico",
                "Analista Fundamentalista",
                "Moderador",
                "Analista de Investimentos"
            ]
        );
    }

    #[test]
    fn test_only_analysts_search_and_delegate() {
        assert!(CrewRole::Technical.uses_search());
        assert!(CrewRole::Fundamental.allows_delegation());
        assert!(!CrewRole::Moderator.uses_search());
        assert!(!CrewRole::Investment.allows_delegation());
    }

    #[test]
    fn test_every_text_is_filled() {
        for language in [ResponseLanguage::Portuguese, ResponseLanguage::English] {
            for role in CrewRole::ALL {
                let persona = role.persona(language);
                let brief = role.brief(language);
                assert!(!persona.goal.is_empty() && !persona.backstory.is_empty());
                assert!(!brief.description.is_empty() && !brief.expected_output.is_empty());
                assert!(!brief.description.contains("  "), "{role:?} {language}");
            }
        }
    }

    #[test]
    fn test_briefs_mention_b3() {
        assert!(
            CrewRole::Moderator
                .brief(ResponseLanguage::Portuguese)
                .description
                .contains("B3")
        );
        assert!(CrewRole::Technical.brief(ResponseLanguage::English).description.contains("B3"));
    }
}
